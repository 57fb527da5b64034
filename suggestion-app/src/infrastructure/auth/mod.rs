mod dev_login;
mod discord_oauth;

pub use dev_login::mock_user;
pub use discord_oauth::{DiscordOAuth, DiscordUserInfo};
pub use oauth2::PkceCodeVerifier;
