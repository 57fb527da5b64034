use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

fn default_vote_value() -> i32 {
    1
}

/// Accepts ids stored as JSON numbers as well as strings.
fn id_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(de::Error::custom(format!("expected a string id, got {other}"))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: String,
    /// Kept as text: older documents hold whatever id the vote URL carried.
    pub suggestion_id: String,
    #[serde(deserialize_with = "id_text")]
    pub user_id: String,
    /// Records written without a value count as an upvote.
    #[serde(default = "default_vote_value")]
    pub vote_value: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Vote {
    pub fn new(suggestion_id: uuid::Uuid, user_id: String, vote_value: i32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            suggestion_id: suggestion_id.to_string(),
            user_id,
            vote_value,
            created_at: chrono::Utc::now(),
            extra: Map::new(),
        }
    }

    pub fn references(&self, suggestion_id: &str) -> bool {
        self.suggestion_id == suggestion_id
    }

    pub fn is_by(&self, suggestion_id: &str, user_id: &str) -> bool {
        self.references(suggestion_id) && self.user_id == user_id
    }
}

/// Result of a vote toggle operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResult {
    pub voted: bool,
    pub new_vote_count: i64,
}
