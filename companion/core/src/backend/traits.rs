//! Reply Source Trait
//!
//! Trait definition for the remote reply collaborator. The engine consults a
//! [`ReplySource`] once per response cycle; the two failure kinds behave
//! identically (uniform fallback text) and are distinguished only in logs.

use async_trait::async_trait;
use thiserror::Error;

/// Errors a reply source can produce
///
/// Variants carry plain descriptions rather than transport types so that
/// test doubles can construct them.
#[derive(Clone, Debug, Error)]
pub enum ReplyError {
    /// Transport-level failure reaching the endpoint
    #[error("failed to reach the reply endpoint: {0}")]
    Fetch(String),

    /// The payload arrived but could not be decoded
    #[error("failed to decode the reply payload: {0}")]
    Decode(String),
}

impl ReplyError {
    /// Short kind label for structured logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::Decode(_) => "decode",
        }
    }
}

impl From<reqwest::Error> for ReplyError {
    fn from(err: reqwest::Error) -> Self {
        Self::Fetch(err.to_string())
    }
}

/// The remote text-generation collaborator
///
/// One operation, one network attempt per call. Implementations should apply
/// a bounded timeout internally so a response cycle is never left pending
/// indefinitely - the engine itself imposes none.
#[async_trait]
pub trait ReplySource: Send + Sync {
    /// Source name for logs (e.g., "no-as-a-service")
    fn name(&self) -> &str;

    /// Produce one reply string
    async fn generate_reply(&self) -> Result<String, ReplyError>;
}
