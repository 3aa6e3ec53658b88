use serde::{Deserialize, Serialize};

use crate::payloads::{IssueAttributes, NoteAttributes, UserRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Issue,
    Comment,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Issue => "issue",
            EventKind::Comment => "note",
        }
    }
}

/// One decoded webhook notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    Issue(IssueEvent),
    Comment(CommentEvent),
}

/// `object_kind: "issue"` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueEvent {
    #[serde(default)]
    pub user: UserRef,
    pub object_attributes: IssueAttributes,
}

/// `object_kind: "note"` payload for a comment left on an issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentEvent {
    #[serde(default)]
    pub user: UserRef,
    pub object_attributes: NoteAttributes,
    pub issue: IssueAttributes,
}

impl IssueEvent {
    /// Assignees, then author, then the last editor. Zero ids are kept.
    pub fn involved_user_ids(&self) -> Vec<u64> {
        let attrs = &self.object_attributes;
        let mut ids = attrs.assignee_ids.clone();
        ids.push(attrs.author_id);
        ids.push(attrs.updated_by_id);
        ids
    }

    pub fn involved_usernames(&self) -> Vec<String> {
        first_mention(&self.object_attributes.description)
            .into_iter()
            .collect()
    }
}

impl CommentEvent {
    /// Parent issue assignees, then the parent issue author.
    pub fn involved_user_ids(&self) -> Vec<u64> {
        let mut ids = self.issue.assignee_ids.clone();
        ids.push(self.issue.author_id);
        ids
    }

    pub fn involved_usernames(&self) -> Vec<String> {
        first_mention(self.object_attributes.text())
            .into_iter()
            .collect()
    }
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Issue(_) => EventKind::Issue,
            Event::Comment(_) => EventKind::Comment,
        }
    }

    /// Attributes of the issue the event is about.
    pub fn issue(&self) -> &IssueAttributes {
        match self {
            Event::Issue(event) => &event.object_attributes,
            Event::Comment(event) => &event.issue,
        }
    }

    pub fn issue_mut(&mut self) -> &mut IssueAttributes {
        match self {
            Event::Issue(event) => &mut event.object_attributes,
            Event::Comment(event) => &mut event.issue,
        }
    }

    pub fn issue_number(&self) -> u64 {
        self.issue().number
    }

    pub fn involved_user_ids(&self) -> Vec<u64> {
        match self {
            Event::Issue(event) => event.involved_user_ids(),
            Event::Comment(event) => event.involved_user_ids(),
        }
    }

    pub fn involved_usernames(&self) -> Vec<String> {
        match self {
            Event::Issue(event) => event.involved_usernames(),
            Event::Comment(event) => event.involved_usernames(),
        }
    }
}

/// Username following the first `@` in `text`, up to the next whitespace.
///
/// Only the first mention is looked at; later ones are ignored.
pub fn first_mention(text: &str) -> Option<String> {
    let (_, after) = text.split_once('@')?;
    let username: String = after.chars().take_while(|c| !c.is_whitespace()).collect();
    if username.is_empty() {
        None
    } else {
        Some(username)
    }
}
