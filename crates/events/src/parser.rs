use tracing::debug;

use crate::error::ParseError;
use crate::models::{CommentEvent, Event, EventKind, IssueEvent};
use crate::payloads::Envelope;

/// Decodes a GitLab webhook body into an [`Event`].
///
/// The body is read twice: once for `object_kind` only, then as the matching
/// event shape.
pub fn parse_event(body: &[u8]) -> Result<Event, ParseError> {
    let envelope: Envelope = serde_json::from_slice(body).map_err(ParseError::Envelope)?;
    debug!(object_kind = %envelope.object_kind, bytes = body.len(), "decoding webhook body");

    match envelope.object_kind.as_str() {
        "issue" => serde_json::from_slice::<IssueEvent>(body)
            .map(Event::Issue)
            .map_err(|source| ParseError::Decode {
                kind: EventKind::Issue.as_str(),
                source,
            }),
        "note" => serde_json::from_slice::<CommentEvent>(body)
            .map(Event::Comment)
            .map_err(|source| ParseError::Decode {
                kind: EventKind::Comment.as_str(),
                source,
            }),
        other => Err(ParseError::UnsupportedKind(other.to_string())),
    }
}
