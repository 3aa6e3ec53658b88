#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("webhook body has no readable object_kind: {0}")]
    Envelope(#[source] serde_json::Error),
    #[error("unsupported object_kind {0:?}")]
    UnsupportedKind(String),
    #[error("malformed {kind} payload: {source}")]
    Decode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
