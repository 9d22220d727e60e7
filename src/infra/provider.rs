use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Quote, QuoteRequest};

/// Shown for every provider failure; the detail only goes to the log.
pub const QUOTE_FAILURE_MESSAGE: &str =
    "Failed to generate quote. The AI model may be temporarily unavailable.";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected response format: {0}")]
    Format(String),
    #[error("{0}")]
    Unknown(String),
}

impl ProviderError {
    pub fn user_message(&self) -> &'static str {
        QUOTE_FAILURE_MESSAGE
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::Format(err.to_string())
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Format(err.to_string())
    }
}

impl From<url::ParseError> for ProviderError {
    fn from(err: url::ParseError) -> Self {
        ProviderError::Unknown(format!("invalid provider URL: {err}"))
    }
}

/// Turns a file, options and optional prior quote into a full [`Quote`].
///
/// One attempt per call; callers decide when to ask again.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn request_quote(&self, request: &QuoteRequest) -> Result<Quote, ProviderError>;
}

/// Stand-in used when no API key is configured.
pub struct UnconfiguredProvider;

#[async_trait]
impl QuoteProvider for UnconfiguredProvider {
    async fn request_quote(&self, _request: &QuoteRequest) -> Result<Quote, ProviderError> {
        Err(ProviderError::Unknown(
            "no API key configured; set GEMINI_API_KEY".to_string(),
        ))
    }
}
