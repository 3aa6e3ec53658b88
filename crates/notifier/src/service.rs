use std::sync::Arc;

use directory::{LookupError, UserDirectory};
use events::{parse_event, Event, ParseError};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::delivery::Messenger;
use crate::metrics;
use crate::names::resolve_names;
use crate::recipients::{resolve_recipients, Recipient};
use crate::render::render;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("cannot parse webhook: {0}")]
    Parse(#[from] ParseError),
    #[error("directory lookup failed: {0}")]
    Lookup(#[from] LookupError),
}

/// What happened to one event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub kind: &'static str,
    pub issue_number: u64,
    pub recipients: usize,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Turns webhook bodies into delivered notifications.
pub struct NotificationService {
    directory: UserDirectory,
    messenger: Arc<dyn Messenger>,
}

impl NotificationService {
    pub fn new(directory: UserDirectory, messenger: Arc<dyn Messenger>) -> Self {
        Self {
            directory,
            messenger,
        }
    }

    /// Parses `body` and runs the event through [`Self::process`].
    pub async fn handle(&self, body: &[u8]) -> Result<DispatchReport, PipelineError> {
        let event = parse_event(body).map_err(|err| {
            metrics::EVENTS_TOTAL
                .with_label_values(&["unknown", "parse_error"])
                .inc();
            err
        })?;
        match serde_json::to_string_pretty(&event) {
            Ok(dump) => debug!(event = %dump, "parsed webhook body"),
            Err(err) => debug!(error = %err, "cannot dump parsed webhook body"),
        }
        self.process(event).await
    }

    #[instrument(skip_all, fields(kind = event.kind().as_str(), issue = event.issue_number()))]
    pub async fn process(&self, mut event: Event) -> Result<DispatchReport, PipelineError> {
        let kind = event.kind().as_str();
        let prepared = self.prepare(&mut event).await;
        let (text, recipients) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => {
                metrics::EVENTS_TOTAL
                    .with_label_values(&[kind, "lookup_error"])
                    .inc();
                return Err(err.into());
            }
        };

        let report = self.deliver(&event, &text, &recipients).await;
        metrics::EVENTS_TOTAL
            .with_label_values(&[kind, "processed"])
            .inc();
        Ok(report)
    }

    /// Resolves names, renders the message and collects recipients.
    async fn prepare(&self, event: &mut Event) -> Result<(String, Vec<Recipient>), LookupError> {
        resolve_names(&self.directory, event).await?;
        let text = render(event);
        let recipients = resolve_recipients(
            &self.directory,
            &event.involved_user_ids(),
            &event.involved_usernames(),
        )
        .await?;
        Ok((text, recipients))
    }

    /// Sends `text` to every deliverable recipient, one at a time. A failed
    /// send is logged and does not stop the remaining ones.
    pub async fn deliver(
        &self,
        event: &Event,
        text: &str,
        recipients: &[Recipient],
    ) -> DispatchReport {
        let issue = event.issue_number();
        let mut report = DispatchReport {
            kind: event.kind().as_str(),
            issue_number: issue,
            recipients: recipients.len(),
            ..Default::default()
        };

        for recipient in recipients {
            let Some(chat_id) = recipient.telegram_id else {
                info!(issue, recipient = %recipient.name, "recipient has no Telegram id, not notified");
                report.skipped += 1;
                metrics::DELIVERIES_TOTAL.with_label_values(&["skipped"]).inc();
                continue;
            };
            match self.messenger.send(chat_id, text).await {
                Ok(()) => {
                    info!(issue, recipient = %recipient.name, "notification sent");
                    report.sent += 1;
                    metrics::DELIVERIES_TOTAL.with_label_values(&["sent"]).inc();
                }
                Err(err) => {
                    error!(issue, recipient = %recipient.name, error = %err, "failed to send notification");
                    report.failed += 1;
                    metrics::DELIVERIES_TOTAL.with_label_values(&["failed"]).inc();
                }
            }
        }

        if recipients.is_empty() {
            warn!(issue, "event has no recipients");
        }
        report
    }
}
