use serde::Deserialize;
use serde_with::{serde_as, DefaultOnNull};

/// User record as returned by `GET /users/:id` and `GET /users?username=`.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub username: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub bio: String,
}

/// A directory user with the Telegram id mined from their bio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryUser {
    pub id: u64,
    pub username: String,
    pub name: String,
    pub telegram_id: Option<i64>,
}
