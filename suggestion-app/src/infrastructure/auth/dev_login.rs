use crate::domain::User;
use serde_json::{Map, Value};

/// Fixed account used when the server runs with `DEV_MODE=true`.
pub fn mock_user() -> User {
    let mut extra = Map::new();
    extra.insert("id".to_string(), Value::from("dev_user_123"));

    User {
        discord_id: "dev_user_123".to_string(),
        username: "DevUser".to_string(),
        discriminator: Some("0001".to_string()),
        avatar: None,
        email: Some("dev@example.com".to_string()),
        roles: vec![
            "111111111111111111".to_string(),
            "222222222222222222".to_string(),
            "123456789012345678".to_string(),
        ],
        extra,
    }
}
