use super::database::{Change, JsonDatabase, StoreError};
use crate::domain::{NewSuggestion, Suggestion, SuggestionUpdate, SuggestionWithVotes};
use uuid::Uuid;

#[derive(Clone)]
pub struct SuggestionRepository {
    db: JsonDatabase,
}

impl SuggestionRepository {
    pub fn new(db: JsonDatabase) -> Self {
        Self { db }
    }

    /// All suggestions in insertion order, each with its vote aggregate.
    pub async fn list_with_votes(&self) -> Result<Vec<SuggestionWithVotes>, StoreError> {
        self.db
            .read(|doc| {
                doc.suggestions
                    .iter()
                    .cloned()
                    .map(|s| SuggestionWithVotes::aggregate(s, &doc.votes))
                    .collect()
            })
            .await
    }

    pub async fn create(&self, fields: NewSuggestion) -> Result<Suggestion, StoreError> {
        let suggestion = Suggestion::new(fields);
        self.db
            .write(|doc| {
                doc.suggestions.push(suggestion.clone());
                Change::Persist(())
            })
            .await?;
        tracing::info!(id = %suggestion.id, title = %suggestion.title, "Suggestion created");
        Ok(suggestion)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Suggestion>, StoreError> {
        self.db
            .read(|doc| doc.suggestions.iter().find(|s| s.id == id).cloned())
            .await
    }

    pub async fn find_by_id_with_votes(
        &self,
        id: Uuid,
    ) -> Result<Option<SuggestionWithVotes>, StoreError> {
        self.db
            .read(|doc| {
                doc.suggestions
                    .iter()
                    .find(|s| s.id == id)
                    .cloned()
                    .map(|s| SuggestionWithVotes::aggregate(s, &doc.votes))
            })
            .await
    }

    pub async fn update(
        &self,
        id: Uuid,
        update: SuggestionUpdate,
    ) -> Result<Option<Suggestion>, StoreError> {
        let updated = self
            .db
            .write(|doc| match doc.suggestions.iter_mut().find(|s| s.id == id) {
                Some(existing) => {
                    existing.apply(update);
                    Change::Persist(Some(existing.clone()))
                }
                None => Change::Skip(None),
            })
            .await?;

        if let Some(s) = &updated {
            tracing::info!(id = %s.id, status = %s.status, "Suggestion updated");
        }
        Ok(updated)
    }

    /// Removes the suggestion record only. Votes that reference it stay in
    /// the document.
    pub async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let existed = self
            .db
            .write(|doc| match doc.suggestions.iter().position(|s| s.id == id) {
                Some(index) => {
                    doc.suggestions.remove(index);
                    Change::Persist(true)
                }
                None => Change::Skip(false),
            })
            .await?;

        if existed {
            tracing::info!(%id, "Suggestion deleted");
        }
        Ok(existed)
    }
}
