use super::database::{Change, JsonDatabase, StoreError};
use crate::domain::{Vote, VoteResult};
use uuid::Uuid;

#[derive(Clone)]
pub struct VoteRepository {
    db: JsonDatabase,
}

impl VoteRepository {
    pub fn new(db: JsonDatabase) -> Self {
        Self { db }
    }

    pub async fn exists(&self, suggestion_id: Uuid, user_id: &str) -> Result<bool, StoreError> {
        let suggestion_id = suggestion_id.to_string();
        self.db
            .read(|doc| doc.votes.iter().any(|v| v.is_by(&suggestion_id, user_id)))
            .await
    }

    /// Appends a vote. There is no duplicate check here; callers that want
    /// one-vote-per-user go through [`VoteRepository::toggle`].
    pub async fn create(
        &self,
        suggestion_id: Uuid,
        user_id: &str,
        vote_value: i32,
    ) -> Result<Vote, StoreError> {
        let vote = Vote::new(suggestion_id, user_id.to_string(), vote_value);
        self.db
            .write(|doc| {
                doc.votes.push(vote.clone());
                Change::Persist(())
            })
            .await?;
        Ok(vote)
    }

    /// Removes the first vote by `user_id` on `suggestion_id`.
    pub async fn delete(&self, suggestion_id: Uuid, user_id: &str) -> Result<bool, StoreError> {
        let suggestion_id = suggestion_id.to_string();
        self.db
            .write(|doc| {
                match doc.votes.iter().position(|v| v.is_by(&suggestion_id, user_id)) {
                    Some(index) => {
                        doc.votes.remove(index);
                        Change::Persist(true)
                    }
                    None => Change::Skip(false),
                }
            })
            .await
    }

    /// Every vote referencing `suggestion_id`, whether or not the suggestion
    /// still exists.
    pub async fn find_by_suggestion(&self, suggestion_id: Uuid) -> Result<Vec<Vote>, StoreError> {
        let suggestion_id = suggestion_id.to_string();
        self.db
            .read(|doc| {
                doc.votes
                    .iter()
                    .filter(|v| v.references(&suggestion_id))
                    .cloned()
                    .collect()
            })
            .await
    }

    /// Toggle vote and return the new state + vote count.
    ///
    /// A second call by the same user removes the earlier vote no matter
    /// which value it carries. Check and mutation happen in one cycle.
    pub async fn toggle(
        &self,
        suggestion_id: Uuid,
        user_id: &str,
        vote_value: i32,
    ) -> Result<VoteResult, StoreError> {
        let key = suggestion_id.to_string();
        let result = self
            .db
            .write(|doc| {
                let voted = match doc.votes.iter().position(|v| v.is_by(&key, user_id)) {
                    Some(index) => {
                        doc.votes.remove(index);
                        false
                    }
                    None => {
                        doc.votes
                            .push(Vote::new(suggestion_id, user_id.to_string(), vote_value));
                        true
                    }
                };
                let new_vote_count = doc
                    .votes
                    .iter()
                    .filter(|v| v.references(&key))
                    .map(|v| i64::from(v.vote_value))
                    .sum();
                Change::Persist(VoteResult {
                    voted,
                    new_vote_count,
                })
            })
            .await?;

        tracing::debug!(
            %suggestion_id,
            user_id,
            voted = result.voted,
            votes = result.new_vote_count,
            "Vote toggled"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::database::tests::temp_path;

    #[tokio::test]
    async fn test_exists_tracks_create_and_delete() -> Result<(), StoreError> {
        let path = temp_path();
        let repo = VoteRepository::new(JsonDatabase::open(&path).await?);
        let sid = Uuid::new_v4();

        assert!(!repo.exists(sid, "u1").await?);
        repo.create(sid, "u1", 1).await?;
        assert!(repo.exists(sid, "u1").await?);
        assert!(!repo.exists(sid, "u2").await?);

        assert!(repo.delete(sid, "u1").await?);
        assert!(!repo.exists(sid, "u1").await?);
        assert!(!repo.delete(sid, "u1").await?);

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_does_not_deduplicate() -> Result<(), StoreError> {
        let path = temp_path();
        let repo = VoteRepository::new(JsonDatabase::open(&path).await?);
        let sid = Uuid::new_v4();

        repo.create(sid, "u1", 1).await?;
        repo.create(sid, "u1", 1).await?;
        assert_eq!(repo.find_by_suggestion(sid).await?.len(), 2);

        // delete only takes the first match
        repo.delete(sid, "u1").await?;
        assert_eq!(repo.find_by_suggestion(sid).await?.len(), 1);

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_removes_regardless_of_value() -> Result<(), StoreError> {
        let path = temp_path();
        let repo = VoteRepository::new(JsonDatabase::open(&path).await?);
        let sid = Uuid::new_v4();

        let first = repo.toggle(sid, "u1", 1).await?;
        assert!(first.voted);
        assert_eq!(first.new_vote_count, 1);

        let second = repo.toggle(sid, "u1", -1).await?;
        assert!(!second.voted);
        assert_eq!(second.new_vote_count, 0);
        assert!(repo.find_by_suggestion(sid).await?.is_empty());

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_toggles_keep_one_vote_each() -> Result<(), StoreError> {
        let path = temp_path();
        let repo = VoteRepository::new(JsonDatabase::open(&path).await?);
        let sid = Uuid::new_v4();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.toggle(sid, &format!("u{i}"), 1).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap()?;
        }

        let votes = repo.find_by_suggestion(sid).await?;
        assert_eq!(votes.len(), 16);

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }
}
