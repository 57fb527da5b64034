mod suggestion;
mod user;
mod vote;

pub use suggestion::{
    NewSuggestion, Suggestion, SuggestionStatus, SuggestionUpdate, SuggestionWithVotes,
};
pub use user::{User, UserUpdate, UserWithPermissions};
pub use vote::{Vote, VoteResult};
