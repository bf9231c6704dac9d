use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("could not decode payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("local storage unavailable: {0}")]
    Storage(String),
    #[error("no browser window")]
    MissingWindow,
}

/// Failure reported by a reset-bus subscriber. Logged by the bus, never propagated.
#[derive(Debug, Error)]
#[error("reset handler failed: {0}")]
pub struct HandlerError(pub String);
