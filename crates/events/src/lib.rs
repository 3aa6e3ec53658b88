pub mod error;
pub mod models;
pub mod parser;
pub mod payloads;

pub use error::ParseError;
pub use models::{first_mention, CommentEvent, Event, EventKind, IssueEvent};
pub use parser::parse_event;
pub use payloads::{IssueAttributes, Label, NoteAttributes, ResolvedNames, UserRef};
