use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("directory request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("directory returned {status} for {endpoint}")]
    Status {
        status: StatusCode,
        endpoint: String,
    },
    #[error("unreadable directory response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid directory url: {0}")]
    Url(#[from] url::ParseError),
    #[error("Telegram_ID {value:?} of {user} is not a valid id")]
    InvalidTelegramId { user: String, value: String },
}

impl LookupError {
    pub fn status(status: StatusCode, endpoint: impl Into<String>) -> Self {
        Self::Status {
            status,
            endpoint: endpoint.into(),
        }
    }
}
