use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub discord_id: String,
    pub username: String,
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Role ids assigned on the Discord guild.
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn new(discord_id: String, username: String, roles: Vec<String>) -> Self {
        Self {
            discord_id,
            username,
            discriminator: None,
            avatar: None,
            email: None,
            roles,
            extra: Map::new(),
        }
    }

    pub fn has_any_role(&self, wanted: &[String]) -> bool {
        wanted.iter().any(|role| self.roles.contains(role))
    }

    pub fn apply(&mut self, update: UserUpdate) {
        if let Some(username) = update.username {
            self.username = username;
        }
        if let Some(discriminator) = update.discriminator {
            self.discriminator = Some(discriminator);
        }
        if let Some(avatar) = update.avatar {
            self.avatar = Some(avatar);
        }
        if let Some(email) = update.email {
            self.email = Some(email);
        }
        if let Some(roles) = update.roles {
            self.roles = roles;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub username: Option<String>,
    pub discriminator: Option<String>,
    pub avatar: Option<String>,
    pub email: Option<String>,
    pub roles: Option<Vec<String>>,
}

impl From<User> for UserUpdate {
    fn from(user: User) -> Self {
        Self {
            username: Some(user.username),
            discriminator: user.discriminator,
            avatar: user.avatar,
            email: user.email,
            roles: Some(user.roles),
        }
    }
}

/// User as returned by `/auth/user`, with permission flags resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithPermissions {
    #[serde(flatten)]
    pub user: User,
    pub can_vote: bool,
    pub is_admin: bool,
}
