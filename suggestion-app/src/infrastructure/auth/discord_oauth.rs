use crate::domain::User;
use oauth2::{
    basic::BasicClient, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;
use suggestion_errors::AppError;

const DISCORD_AUTH_URL: &str = "https://discord.com/oauth2/authorize";
const DISCORD_TOKEN_URL: &str = "https://discord.com/api/oauth2/token";
const DISCORD_API_URL: &str = "https://discord.com/api";

#[derive(Debug, Deserialize)]
pub struct DiscordUserInfo {
    pub id: String, // Discord snowflake
    pub username: String,
    pub discriminator: Option<String>,
    pub avatar: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GuildMember {
    #[serde(default)]
    roles: Vec<String>,
}

// Type alias for the configured OAuth client
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    oauth2::EndpointSet,
    oauth2::EndpointNotSet,
    oauth2::EndpointNotSet,
    oauth2::EndpointNotSet,
    oauth2::EndpointSet,
>;

#[derive(Clone)]
pub struct DiscordOAuth {
    client: ConfiguredClient,
    redirect_uri: RedirectUrl,
    guild_id: String,
    http_client: reqwest::Client,
}

impl DiscordOAuth {
    pub fn new(
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
        guild_id: &str,
    ) -> Result<Self, AppError> {
        let auth_url = AuthUrl::new(DISCORD_AUTH_URL.to_string())
            .map_err(|e| AppError::OAuth(e.to_string()))?;
        let token_url = TokenUrl::new(DISCORD_TOKEN_URL.to_string())
            .map_err(|e| AppError::OAuth(e.to_string()))?;
        let redirect = RedirectUrl::new(redirect_uri.to_string())
            .map_err(|e| AppError::OAuth(format!("invalid redirect uri: {}", e)))?;

        let client = BasicClient::new(ClientId::new(client_id.to_string()))
            .set_client_secret(ClientSecret::new(client_secret.to_string()))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url);

        Ok(Self {
            client,
            redirect_uri: redirect,
            guild_id: guild_id.to_string(),
            http_client: reqwest::Client::new(),
        })
    }

    /// Generate the authorization URL and PKCE verifier
    pub fn get_auth_url(&self) -> (String, CsrfToken, PkceCodeVerifier) {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (auth_url, csrf_token) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .set_redirect_uri(std::borrow::Cow::Borrowed(&self.redirect_uri))
            .add_scope(Scope::new("identify".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("guilds.members.read".to_string()))
            .set_pkce_challenge(pkce_challenge)
            .url();

        (auth_url.to_string(), csrf_token, pkce_verifier)
    }

    /// Exchange the authorization code, then load the profile and the role
    /// ids the user holds on the configured guild.
    pub async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: PkceCodeVerifier,
    ) -> Result<User, AppError> {
        let http_client = oauth2::reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AppError::OAuth(format!("Failed to build HTTP client: {}", e)))?;

        let token_result = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_redirect_uri(std::borrow::Cow::Borrowed(&self.redirect_uri))
            .set_pkce_verifier(pkce_verifier)
            .request_async(&http_client)
            .await
            .map_err(|e| AppError::OAuth(format!("Token exchange failed: {:?}", e)))?;

        let access_token = token_result.access_token().secret();

        let info: DiscordUserInfo = self
            .get_json(&format!("{}/users/@me", DISCORD_API_URL), access_token)
            .await?;

        // Not being a guild member is not an error, it just means no roles.
        let roles = match self
            .get_json::<GuildMember>(
                &format!("{}/users/@me/guilds/{}/member", DISCORD_API_URL, self.guild_id),
                access_token,
            )
            .await
        {
            Ok(member) => member.roles,
            Err(e) => {
                tracing::warn!(discord_id = %info.id, "Could not load guild roles: {}", e);
                Vec::new()
            }
        };

        Ok(User {
            discord_id: info.id,
            username: info.username,
            discriminator: info.discriminator,
            avatar: info.avatar,
            email: info.email,
            roles,
            extra: Default::default(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<T, AppError> {
        self.http_client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::OAuth(format!("Request to {} failed: {}", url, e)))?
            .json::<T>()
            .await
            .map_err(|e| AppError::OAuth(format!("Failed to parse {}: {}", url, e)))
    }
}
