use crate::domain::VoteResult;
use crate::infrastructure::db::VoteRepository;
use crate::infrastructure::security::InputSanitizer;
use serde::Deserialize;
use suggestion_errors::AppError;
use uuid::Uuid;

/// Body of `PUT /api/suggestions/{id}/vote`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub user_id: Option<String>,
    pub vote_value: Option<i32>,
}

pub struct ToggleVote {
    votes: VoteRepository,
}

impl ToggleVote {
    pub fn new(votes: VoteRepository) -> Self {
        Self { votes }
    }

    /// Adds the user's vote, or removes it if one is already there. A missing
    /// or zero value counts as an upvote. The suggestion is not required to
    /// exist.
    pub async fn execute(
        &self,
        suggestion_id: Uuid,
        request: VoteRequest,
    ) -> Result<VoteResult, AppError> {
        let user_id = InputSanitizer::validate_user_id(request.user_id)?;
        let vote_value = match request.vote_value {
            None | Some(0) => 1,
            Some(v) => v,
        };

        let result = self.votes.toggle(suggestion_id, &user_id, vote_value).await?;
        Ok(result)
    }
}
