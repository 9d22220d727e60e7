//! Outbound side: the quote provider seam and its Gemini implementation.

pub mod gemini;
pub mod prompt;
pub mod provider;

pub use gemini::GeminiClient;
pub use provider::{ProviderError, QuoteProvider, UnconfiguredProvider, QUOTE_FAILURE_MESSAGE};
