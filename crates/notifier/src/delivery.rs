use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("telegram request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("telegram rejected the message ({code:?}): {description}")]
    Rejected {
        code: Option<i64>,
        description: String,
    },
    #[error("unreadable telegram response (status {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid telegram api url: {0}")]
    Url(#[from] url::ParseError),
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        // The request url carries the bot token.
        Self::Transport(err.without_url())
    }
}

#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends MarkdownV2 `text` to the Telegram chat `chat_id`.
    async fn send(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError>;
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

#[derive(Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
}

/// [`Messenger`] over the Telegram Bot API `sendMessage` method.
pub struct TelegramMessenger {
    http: reqwest::Client,
    endpoint: Url,
}

impl TelegramMessenger {
    pub fn new(api_url: &str, token: &str, timeout: Duration) -> Result<Self, DeliveryError> {
        let endpoint = Url::parse(&format!(
            "{}/bot{}/sendMessage",
            api_url.trim_end_matches('/'),
            token
        ))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    #[instrument(skip(self, text), fields(len = text.len()))]
    async fn send(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError> {
        let request = SendMessage {
            chat_id,
            text,
            parse_mode: "MarkdownV2",
            disable_web_page_preview: true,
        };
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        let reply: BotApiResponse =
            serde_json::from_slice(&body).map_err(|source| DeliveryError::Decode {
                status: status.as_u16(),
                source,
            })?;
        if !reply.ok {
            return Err(DeliveryError::Rejected {
                code: reply.error_code,
                description: reply.description.unwrap_or_default(),
            });
        }
        debug!(chat_id, "telegram accepted message");
        Ok(())
    }
}
