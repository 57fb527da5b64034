use std::path::PathBuf;
use suggestion_errors::AppError;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_DATA_FILE: &str = "./data/database.json";

#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub guild_id: String,
}

#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub port: u16,
    pub frontend_url: String,
    pub dev_mode: bool,
    pub voter_roles: Vec<String>,
    pub admin_roles: Vec<String>,
    pub data_file: PathBuf,
    /// Present only when every `DISCORD_*` variable is set.
    pub discord: Option<DiscordConfig>,
}

impl BoardConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| AppError::Internal(format!("PORT is not a valid port: {}", raw)))?,
            None => DEFAULT_PORT,
        };

        let discord = match (
            lookup("DISCORD_CLIENT_ID"),
            lookup("DISCORD_CLIENT_SECRET"),
            lookup("DISCORD_REDIRECT_URI"),
            lookup("DISCORD_GUILD_ID"),
        ) {
            (Some(client_id), Some(client_secret), Some(redirect_uri), Some(guild_id)) => {
                Some(DiscordConfig {
                    client_id,
                    client_secret,
                    redirect_uri,
                    guild_id,
                })
            }
            _ => None,
        };

        Ok(Self {
            port,
            frontend_url: lookup("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string()),
            dev_mode: lookup("DEV_MODE").as_deref() == Some("true"),
            voter_roles: parse_roles(lookup("VOTER_ROLES")),
            admin_roles: parse_roles(lookup("ADMIN_ROLES")),
            data_file: lookup("DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
            discord,
        })
    }
}

fn parse_roles(raw: Option<String>) -> Vec<String> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}
