use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::client::DirectoryClient;
use crate::error::LookupError;
use crate::model::{DirectoryUser, UserRecord};

/// Label users put in their bio in front of their Telegram id.
pub const TELEGRAM_ID_LABEL: &str = "Telegram_ID";

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new("[0-9]+").expect("invalid regex"));

/// Extracts the Telegram id from a free-text bio.
///
/// `Ok(None)` when the label is absent. Once the label is found, the first
/// run of digits after it must be a valid id.
pub fn telegram_id_from_bio(user: &str, bio: &str) -> Result<Option<i64>, LookupError> {
    let Some(start) = bio.find(TELEGRAM_ID_LABEL) else {
        return Ok(None);
    };
    let rest = &bio[start + TELEGRAM_ID_LABEL.len()..];
    let invalid = |value: &str| LookupError::InvalidTelegramId {
        user: user.to_string(),
        value: value.to_string(),
    };
    let digits = DIGITS.find(rest).ok_or_else(|| invalid(rest.trim()))?;
    digits
        .as_str()
        .parse::<i64>()
        .map(Some)
        .map_err(|_| invalid(digits.as_str()))
}

/// Read-only view over the directory. Holds no state between calls.
#[derive(Clone)]
pub struct UserDirectory {
    client: Arc<dyn DirectoryClient>,
}

impl UserDirectory {
    pub fn new(client: Arc<dyn DirectoryClient>) -> Self {
        Self { client }
    }

    /// Id `0` means "no user" and is answered without a request.
    pub async fn resolve_by_id(&self, id: u64) -> Result<Option<DirectoryUser>, LookupError> {
        if id == 0 {
            return Ok(None);
        }
        let record = self.client.get_user(id).await?;
        let subject = format!("user with id {id}");
        to_directory_user(record, &subject).map(Some)
    }

    /// `Ok(None)` when no user has this username.
    pub async fn resolve_by_username(
        &self,
        username: &str,
    ) -> Result<Option<DirectoryUser>, LookupError> {
        let mut matches = self.client.find_users(username).await?;
        if matches.is_empty() {
            debug!(username, "no directory user with this username");
            return Ok(None);
        }
        let record = matches.swap_remove(0);
        let subject = format!("user {username}");
        to_directory_user(record, &subject).map(Some)
    }

    /// Display name of a user, or an empty string for id `0`.
    pub async fn name_by_id(&self, id: u64) -> Result<String, LookupError> {
        if id == 0 {
            return Ok(String::new());
        }
        Ok(self.client.get_user(id).await?.name)
    }
}

fn to_directory_user(record: UserRecord, subject: &str) -> Result<DirectoryUser, LookupError> {
    let telegram_id = telegram_id_from_bio(subject, &record.bio)?;
    if telegram_id.is_none() {
        warn!(user = %subject, label = TELEGRAM_ID_LABEL, "no Telegram id in directory bio");
    }
    Ok(DirectoryUser {
        id: record.id,
        username: record.username,
        name: record.name,
        telegram_id,
    })
}
