use crate::application::{SubmitSuggestion, ToggleVote};
use crate::config::BoardConfig;
use crate::infrastructure::auth::DiscordOAuth;
use crate::infrastructure::db::{JsonDatabase, SuggestionRepository, UserRepository, VoteRepository};
use crate::infrastructure::security::AccessPolicy;
use std::sync::Arc;
use suggestion_errors::AppError;

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<BoardConfig>,
    pub db: JsonDatabase,
    pub suggestion_repo: SuggestionRepository,
    pub vote_repo: VoteRepository,
    pub user_repo: UserRepository,
    pub submit_suggestion: Arc<SubmitSuggestion>,
    pub toggle_vote: Arc<ToggleVote>,
    pub access_policy: AccessPolicy,
    pub discord: Option<DiscordOAuth>,
}

impl AppContext {
    /// Opens the board document and wires the repositories around it.
    pub async fn new(config: BoardConfig) -> Result<Self, AppError> {
        let db = JsonDatabase::open(&config.data_file).await?;

        let suggestion_repo = SuggestionRepository::new(db.clone());
        let vote_repo = VoteRepository::new(db.clone());
        let user_repo = UserRepository::new(db.clone());

        let access_policy = AccessPolicy::new(
            config.voter_roles.clone(),
            config.admin_roles.clone(),
            config.dev_mode,
        );

        let discord = match (&config.discord, config.dev_mode) {
            (Some(d), false) => {
                tracing::info!("Using Discord OAuth login");
                Some(DiscordOAuth::new(
                    &d.client_id,
                    &d.client_secret,
                    &d.redirect_uri,
                    &d.guild_id,
                )?)
            }
            (_, true) => {
                tracing::info!("Development mode: using mock authentication");
                None
            }
            (None, false) => {
                tracing::warn!("DISCORD_* not configured; login is disabled");
                None
            }
        };

        Ok(Self {
            config: Arc::new(config),
            db,
            submit_suggestion: Arc::new(SubmitSuggestion::new(suggestion_repo.clone())),
            toggle_vote: Arc::new(ToggleVote::new(vote_repo.clone())),
            suggestion_repo,
            vote_repo,
            user_repo,
            access_policy,
            discord,
        })
    }

    pub async fn from_env() -> Result<Self, AppError> {
        let config = BoardConfig::from_env()?;
        tracing::info!(
            "Server starting in {} mode",
            if config.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" }
        );
        tracing::info!("Voter roles: {:?}", config.voter_roles);
        tracing::info!("Admin roles: {:?}", config.admin_roles);
        Self::new(config).await
    }

    pub async fn shutdown(self) {
        self.db.close().await;
    }
}
