pub mod client;
pub mod error;
pub mod model;
pub mod resolver;

pub use client::{DirectoryClient, GitlabDirectoryClient};
pub use error::LookupError;
pub use model::{DirectoryUser, UserRecord};
pub use resolver::{telegram_id_from_bio, UserDirectory, TELEGRAM_ID_LABEL};
