use crate::domain::{NewSuggestion, Suggestion, User};
use crate::infrastructure::db::SuggestionRepository;
use crate::infrastructure::security::InputSanitizer;
use serde::Deserialize;
use suggestion_errors::AppError;

const ANONYMOUS_ID: &str = "anonymous";
const ANONYMOUS_NAME: &str = "Anonymous";

/// Body of `POST /api/suggestions`. Everything is optional here so the
/// presence check can answer with a 400 instead of a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author_id: Option<String>,
    pub author_name: Option<String>,
}

pub struct SubmitSuggestion {
    suggestions: SuggestionRepository,
}

impl SubmitSuggestion {
    pub fn new(suggestions: SuggestionRepository) -> Self {
        Self { suggestions }
    }

    /// Author falls back to the session user, then to "anonymous".
    pub async fn execute(
        &self,
        request: SuggestionRequest,
        session_user: Option<&User>,
    ) -> Result<Suggestion, AppError> {
        let (title, description) =
            InputSanitizer::validate_suggestion(request.title, request.description)?;

        let author_id = request
            .author_id
            .or_else(|| session_user.map(|u| u.discord_id.clone()))
            .unwrap_or_else(|| ANONYMOUS_ID.to_string());
        let author_name = request
            .author_name
            .or_else(|| session_user.map(|u| u.username.clone()))
            .unwrap_or_else(|| ANONYMOUS_NAME.to_string());

        let suggestion = self
            .suggestions
            .create(NewSuggestion {
                title,
                description,
                author_id,
                author_name,
            })
            .await?;
        Ok(suggestion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SuggestionStatus;
    use crate::infrastructure::db::JsonDatabase;

    async fn submitter() -> (SubmitSuggestion, std::path::PathBuf) {
        let dir = std::env::temp_dir().join(format!("submit_suggestion_{}", uuid::Uuid::new_v4()));
        let db = JsonDatabase::open(dir.join("database.json")).await.unwrap();
        (SubmitSuggestion::new(SuggestionRepository::new(db)), dir)
    }

    #[tokio::test]
    async fn test_defaults_to_anonymous() {
        let (submit, dir) = submitter().await;
        let request = SuggestionRequest {
            title: Some("Add dark mode".into()),
            description: Some("...".into()),
            ..SuggestionRequest::default()
        };

        let created = submit.execute(request, None).await.unwrap();
        assert_eq!(created.author_id, "anonymous");
        assert_eq!(created.author_name, "Anonymous");
        assert_eq!(created.status, SuggestionStatus::Open);

        let _ = tokio::fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn test_session_user_is_author() {
        let (submit, dir) = submitter().await;
        let user = User::new("42".into(), "ferris".into(), vec![]);
        let request = SuggestionRequest {
            title: Some("Add dark mode".into()),
            description: Some("...".into()),
            ..SuggestionRequest::default()
        };

        let created = submit.execute(request, Some(&user)).await.unwrap();
        assert_eq!(created.author_id, "42");
        assert_eq!(created.author_name, "ferris");

        let _ = tokio::fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn test_missing_title_is_rejected() {
        let (submit, dir) = submitter().await;
        let request = SuggestionRequest {
            description: Some("...".into()),
            ..SuggestionRequest::default()
        };

        let err = submit.execute(request, None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let _ = tokio::fs::remove_dir_all(dir).await;
    }
}
