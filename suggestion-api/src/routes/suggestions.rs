use crate::session;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use suggestion_app::application::{SuggestionRequest, VoteRequest};
use suggestion_app::domain::{Suggestion, SuggestionUpdate, SuggestionWithVotes};
use suggestion_app::AppContext;
use suggestion_errors::AppError;
use tower_sessions::Session;
use uuid::Uuid;

#[derive(Serialize)]
pub struct VoteResponse {
    message: &'static str,
    voted: bool,
    votes: i64,
}

/// Ids that do not parse cannot exist, so they are reported as missing.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found("Suggestion"))
}

/// Bodies are parsed after the permission check so anonymous callers see
/// 401/403 rather than a body error.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

pub async fn list(State(ctx): State<AppContext>) -> Result<Json<Vec<SuggestionWithVotes>>, AppError> {
    let suggestions = ctx.suggestion_repo.list_with_votes().await?;
    Ok(Json(suggestions))
}

pub async fn show(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<SuggestionWithVotes>, AppError> {
    ctx.suggestion_repo
        .find_by_id_with_votes(parse_id(&id)?)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Suggestion"))
}

pub async fn create(
    State(ctx): State<AppContext>,
    session: Session,
    payload: Result<Json<SuggestionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Suggestion>), AppError> {
    let user = session::require_voter(&ctx, &session).await?;
    let suggestion = ctx
        .submit_suggestion
        .execute(body(payload)?, Some(&user))
        .await?;
    Ok((StatusCode::CREATED, Json(suggestion)))
}

pub async fn update(
    State(ctx): State<AppContext>,
    session: Session,
    Path(id): Path<String>,
    payload: Result<Json<SuggestionUpdate>, JsonRejection>,
) -> Result<Json<Suggestion>, AppError> {
    session::require_admin(&ctx, &session).await?;
    ctx.suggestion_repo
        .update(parse_id(&id)?, body(payload)?)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Suggestion"))
}

pub async fn remove(
    State(ctx): State<AppContext>,
    session: Session,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    session::require_admin(&ctx, &session).await?;
    if ctx.suggestion_repo.delete(parse_id(&id)?).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Suggestion"))
    }
}

pub async fn vote(
    State(ctx): State<AppContext>,
    session: Session,
    Path(id): Path<String>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Json<VoteResponse>, AppError> {
    let user = session::require_voter(&ctx, &session).await?;
    let request = body(payload)?;
    if let Some(voter) = request.user_id.as_deref().filter(|v| *v != user.discord_id) {
        tracing::info!(discord_id = %user.discord_id, voter, "Vote cast under another user id");
    }
    let result = ctx.toggle_vote.execute(parse_id(&id)?, request).await?;
    Ok(Json(VoteResponse {
        message: if result.voted { "Vote added" } else { "Vote removed" },
        voted: result.voted,
        votes: result.new_vote_count,
    }))
}
