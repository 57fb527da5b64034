use suggestion_app::domain::User;
use suggestion_app::AppContext;
use suggestion_errors::AppError;
use tower_sessions::Session;

const USER_KEY: &str = "user";
const CSRF_KEY: &str = "oauth_csrf";
const PKCE_KEY: &str = "oauth_pkce";

fn session_error(e: tower_sessions::session::Error) -> AppError {
    AppError::Internal(format!("session store: {}", e))
}

pub async fn current_user(session: &Session) -> Result<Option<User>, AppError> {
    session.get::<User>(USER_KEY).await.map_err(session_error)
}

pub async fn log_in(session: &Session, user: &User) -> Result<(), AppError> {
    session.cycle_id().await.map_err(session_error)?;
    session.insert(USER_KEY, user).await.map_err(session_error)
}

pub async fn log_out(session: &Session) -> Result<(), AppError> {
    session.flush().await.map_err(session_error)
}

pub async fn remember_oauth_state(
    session: &Session,
    csrf: &str,
    pkce_verifier: &str,
) -> Result<(), AppError> {
    session.insert(CSRF_KEY, csrf).await.map_err(session_error)?;
    session.insert(PKCE_KEY, pkce_verifier).await.map_err(session_error)
}

/// Takes the CSRF state and PKCE verifier stored by the login redirect.
/// Both are single use.
pub async fn take_oauth_state(session: &Session) -> Result<Option<(String, String)>, AppError> {
    let csrf = session.remove::<String>(CSRF_KEY).await.map_err(session_error)?;
    let pkce = session.remove::<String>(PKCE_KEY).await.map_err(session_error)?;
    Ok(csrf.zip(pkce))
}

pub async fn require_user(session: &Session) -> Result<User, AppError> {
    current_user(session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
}

pub async fn require_voter(ctx: &AppContext, session: &Session) -> Result<User, AppError> {
    let user = require_user(session).await?;
    if !ctx.access_policy.can_vote(&user) {
        tracing::warn!(discord_id = %user.discord_id, "Vote permission denied");
        return Err(AppError::Forbidden("Insufficient permissions to vote".to_string()));
    }
    Ok(user)
}

pub async fn require_admin(ctx: &AppContext, session: &Session) -> Result<User, AppError> {
    let user = require_user(session).await?;
    if !ctx.access_policy.is_admin(&user) {
        tracing::warn!(discord_id = %user.discord_id, "Admin permission denied");
        return Err(AppError::Forbidden("Admin permissions required".to_string()));
    }
    Ok(user)
}
