use directory::{LookupError, UserDirectory};
use serde::Serialize;
use tracing::debug;

/// Where a recipient came from in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DirectoryRef {
    Id(u64),
    /// Found through an `@username` mention rather than a user id.
    Mention,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    pub name: String,
    pub directory_ref: DirectoryRef,
    pub telegram_id: Option<i64>,
}

impl Recipient {
    pub fn is_deliverable(&self) -> bool {
        self.telegram_id.is_some()
    }
}

/// Appends `recipient` unless one with the same Telegram id is already listed.
/// Recipients without a Telegram id are always appended.
fn push_unique(recipients: &mut Vec<Recipient>, recipient: Recipient) {
    if let Some(telegram_id) = recipient.telegram_id {
        if recipients
            .iter()
            .any(|existing| existing.telegram_id == Some(telegram_id))
        {
            debug!(name = %recipient.name, telegram_id, "recipient already listed");
            return;
        }
    }
    recipients.push(recipient);
}

/// Builds the recipient list for an event's involved users.
///
/// Zero ids are skipped. Any failed lookup aborts the whole resolution.
pub async fn resolve_recipients(
    directory: &UserDirectory,
    user_ids: &[u64],
    usernames: &[String],
) -> Result<Vec<Recipient>, LookupError> {
    let mut recipients = Vec::new();

    for &id in user_ids.iter().filter(|id| **id != 0) {
        let telegram_id = directory
            .resolve_by_id(id)
            .await?
            .and_then(|user| user.telegram_id);
        let name = directory.name_by_id(id).await?;
        push_unique(
            &mut recipients,
            Recipient {
                name,
                directory_ref: DirectoryRef::Id(id),
                telegram_id,
            },
        );
    }

    for username in usernames {
        let telegram_id = directory
            .resolve_by_username(username)
            .await?
            .and_then(|user| user.telegram_id);
        push_unique(
            &mut recipients,
            Recipient {
                name: username.clone(),
                directory_ref: DirectoryRef::Mention,
                telegram_id,
            },
        );
    }

    Ok(recipients)
}
