use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::Vote;

/// Triage state of a suggestion. Serialized with the labels shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SuggestionStatus {
    #[default]
    Open,
    Planned,
    #[serde(rename = "In Progress")]
    InProgress,
    Rejected,
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Open => "Open",
            Self::Planned => "Planned",
            Self::InProgress => "In Progress",
            Self::Rejected => "Rejected",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: uuid::Uuid,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: SuggestionStatus,
    pub author_id: String,
    pub author_name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    /// Fields this service does not model, carried through rewrites.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Suggestion {
    pub fn new(fields: NewSuggestion) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: uuid::Uuid::new_v4(),
            title: fields.title,
            description: fields.description,
            status: SuggestionStatus::Open,
            author_id: fields.author_id,
            author_name: fields.author_name,
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        }
    }

    /// Applies the given fields and bumps `updated_at`. Identity, author and
    /// creation time are never touched.
    pub fn apply(&mut self, update: SuggestionUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = chrono::Utc::now();
    }
}

/// Fields supplied by the submitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSuggestion {
    pub title: String,
    pub description: String,
    pub author_id: String,
    pub author_name: String,
}

/// The mutable subset of a suggestion. Anything else in a request body is
/// dropped during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionUpdate {
    pub status: Option<SuggestionStatus>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl SuggestionUpdate {
    pub fn status(status: SuggestionStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Suggestion with its read-time vote aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionWithVotes {
    #[serde(flatten)]
    pub suggestion: Suggestion,
    pub votes: i64,
    pub voters: Vec<Vote>,
}

impl SuggestionWithVotes {
    /// Sums `vote_value` over the votes that reference `suggestion`.
    ///
    /// A stale `votes` or `voters` entry stored on the record is dropped from
    /// the view so it cannot shadow the computed aggregate.
    pub fn aggregate<'a>(
        mut suggestion: Suggestion,
        votes: impl IntoIterator<Item = &'a Vote>,
    ) -> Self {
        let id = suggestion.id.to_string();
        let voters: Vec<Vote> = votes
            .into_iter()
            .filter(|v| v.references(&id))
            .cloned()
            .collect();
        suggestion.extra.remove("votes");
        suggestion.extra.remove("voters");
        let total = voters.iter().map(|v| i64::from(v.vote_value)).sum();
        Self {
            suggestion,
            votes: total,
            voters,
        }
    }
}
