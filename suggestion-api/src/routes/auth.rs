use crate::session;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use suggestion_app::domain::UserWithPermissions;
use suggestion_app::infrastructure::auth::{mock_user, PkceCodeVerifier};
use suggestion_app::AppContext;
use suggestion_errors::AppError;
use tower_sessions::Session;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// API clients ask for JSON; browsers get redirected back to the frontend.
fn wants_json(headers: &HeaderMap) -> bool {
    let accepts_json = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    let is_xhr = headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "XMLHttpRequest");
    accepts_json || is_xhr
}

pub async fn login(
    State(ctx): State<AppContext>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if ctx.access_policy.dev_mode() {
        let user = ctx.user_repo.upsert(mock_user()).await?;
        session::log_in(&session, &user).await?;
        tracing::info!(discord_id = %user.discord_id, "Dev login");

        if wants_json(&headers) {
            return Ok(Json(json!({
                "success": true,
                "message": "Dev login successful",
                "user": user,
            }))
            .into_response());
        }
        return Ok(Redirect::to(&ctx.config.frontend_url).into_response());
    }

    let discord = ctx
        .discord
        .as_ref()
        .ok_or_else(|| AppError::Unauthorized("Login is not configured".to_string()))?;
    let (auth_url, csrf, pkce_verifier) = discord.get_auth_url();
    session::remember_oauth_state(&session, csrf.secret(), pkce_verifier.secret()).await?;
    Ok(Redirect::to(&auth_url).into_response())
}

pub async fn callback(
    State(ctx): State<AppContext>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect, AppError> {
    let discord = ctx
        .discord
        .as_ref()
        .ok_or_else(|| AppError::Unauthorized("Login is not configured".to_string()))?;

    if let Some(error) = params.error {
        return Err(AppError::OAuth(format!("Discord returned {}", error)));
    }

    let (expected_state, verifier) = session::take_oauth_state(&session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("No login in progress".to_string()))?;
    if params.state.as_deref() != Some(expected_state.as_str()) {
        tracing::warn!("OAuth state mismatch");
        return Err(AppError::Unauthorized("Invalid login state".to_string()));
    }
    let code = params
        .code
        .ok_or_else(|| AppError::Validation("Missing authorization code".to_string()))?;

    let profile = discord
        .exchange_code(&code, PkceCodeVerifier::new(verifier))
        .await?;
    let user = ctx.user_repo.upsert(profile).await?;
    session::log_in(&session, &user).await?;
    tracing::info!(discord_id = %user.discord_id, roles = user.roles.len(), "Discord login");

    Ok(Redirect::to(&ctx.config.frontend_url))
}

pub async fn current_user(
    State(ctx): State<AppContext>,
    session: Session,
) -> Result<Json<UserWithPermissions>, AppError> {
    let user = session::current_user(&session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;

    Ok(Json(UserWithPermissions {
        can_vote: ctx.access_policy.can_vote(&user),
        is_admin: ctx.access_policy.is_admin(&user),
        user,
    }))
}

pub async fn logout(session: Session) -> Result<Json<serde_json::Value>, AppError> {
    session::log_out(&session).await.map_err(|e| {
        tracing::error!("Session destroy error: {}", e);
        AppError::Internal("Logout failed".to_string())
    })?;
    Ok(Json(json!({ "message": "Logged out successfully" })))
}
