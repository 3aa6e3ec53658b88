use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

/// Minimal view of a webhook body, used to pick the concrete event shape.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub object_kind: String,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub id: u64,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub username: String,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: u64,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub title: String,
}

/// Display names filled in after the directory lookups. Never read from the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedNames {
    pub author: String,
    pub editor: String,
    pub assignees: Vec<String>,
}

/// Issue attributes shared by issue events (`object_attributes`) and comment
/// events (`issue`). User ids of `0` mean "no such user".
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueAttributes {
    #[serde(rename = "iid")]
    pub number: u64,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub author_id: u64,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub assignee_ids: Vec<u64>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub updated_by_id: u64,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub action: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub state: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub title: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub description: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub url: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(skip_deserializing, default)]
    pub resolved: ResolvedNames,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteAttributes {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub note: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub description: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default, alias = "URL")]
    pub url: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub noteable_type: String,
}

impl NoteAttributes {
    /// Comment body; older payloads only carry it in `description`.
    pub fn text(&self) -> &str {
        if self.note.is_empty() {
            &self.description
        } else {
            &self.note
        }
    }
}
