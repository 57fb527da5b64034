mod database;
mod suggestion_repository;
mod user_repository;
mod vote_repository;

pub use database::{BoardDocument, JsonDatabase, StoreError};
pub use suggestion_repository::SuggestionRepository;
pub use user_repository::UserRepository;
pub use vote_repository::VoteRepository;
