pub mod delivery;
pub mod metrics;
pub mod names;
pub mod recipients;
pub mod render;
pub mod service;

pub use delivery::{DeliveryError, Messenger, TelegramMessenger};
pub use names::resolve_names;
pub use recipients::{resolve_recipients, DirectoryRef, Recipient};
pub use render::{render, render_comment, render_issue};
pub use service::{DispatchReport, NotificationService, PipelineError};
