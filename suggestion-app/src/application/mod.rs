mod submit_suggestion;
mod toggle_vote;

pub use submit_suggestion::{SubmitSuggestion, SuggestionRequest};
pub use toggle_vote::{ToggleVote, VoteRequest};
