use super::database::{Change, JsonDatabase, StoreError};
use crate::domain::{User, UserUpdate};

#[derive(Clone)]
pub struct UserRepository {
    db: JsonDatabase,
}

impl UserRepository {
    pub fn new(db: JsonDatabase) -> Self {
        Self { db }
    }

    pub async fn find_by_discord_id(&self, discord_id: &str) -> Result<Option<User>, StoreError> {
        self.db
            .read(|doc| doc.users.iter().find(|u| u.discord_id == discord_id).cloned())
            .await
    }

    /// Appends the user as given. Uniqueness of `discord_id` is the caller's
    /// concern; use [`UserRepository::upsert`] from login flows.
    pub async fn create(&self, user: User) -> Result<User, StoreError> {
        self.db
            .write(|doc| {
                doc.users.push(user.clone());
                Change::Persist(())
            })
            .await?;
        Ok(user)
    }

    /// Merges the given fields into the stored user. Last write wins.
    pub async fn update(
        &self,
        discord_id: &str,
        update: UserUpdate,
    ) -> Result<Option<User>, StoreError> {
        self.db
            .write(|doc| match doc.users.iter_mut().find(|u| u.discord_id == discord_id) {
                Some(existing) => {
                    existing.apply(update);
                    Change::Persist(Some(existing.clone()))
                }
                None => Change::Skip(None),
            })
            .await
    }

    pub async fn upsert(&self, user_data: User) -> Result<User, StoreError> {
        let stored = self
            .db
            .write(|doc| {
                match doc
                    .users
                    .iter_mut()
                    .find(|u| u.discord_id == user_data.discord_id)
                {
                    // Update existing user
                    Some(existing) => {
                        existing.apply(UserUpdate::from(user_data));
                        Change::Persist(existing.clone())
                    }
                    // Insert new user
                    None => {
                        doc.users.push(user_data.clone());
                        Change::Persist(user_data)
                    }
                }
            })
            .await?;

        tracing::info!(discord_id = %stored.discord_id, roles = stored.roles.len(), "User saved");
        Ok(stored)
    }
}
