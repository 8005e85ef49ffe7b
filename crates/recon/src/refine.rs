use async_trait::async_trait;
use thiserror::Error;

use docanchor_core::MatchResult;

use crate::locator::FragmentMatch;

#[derive(Debug, Error)]
pub enum RefineError {
    #[error("Refinement is disabled")]
    Disabled,
    #[error("GEMINI_API_KEY not set")]
    MissingApiKey,
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("Empty model reply")]
    EmptyReply,
    #[error("Malformed model reply: {0}")]
    MalformedReply(String),
}

/// Advisory adjustment of a locally-found match by a generative model.
///
/// The result is explicit: callers decide what an `Err` means (in practice,
/// fall back to the unrefined match) instead of having failures swallowed
/// here. Each call is attempted at most once — no retries.
#[async_trait]
pub trait RefineBackend: Send + Sync {
    async fn refine(
        &self,
        field: &str,
        value: &str,
        candidate: &FragmentMatch,
    ) -> Result<MatchResult, RefineError>;
}

// ── Placeholder backend (refinement disabled) ─────────────────────────────────

/// Backend used when refinement is switched off; always errors, so callers
/// keep the local match.
pub struct NoRefine;

#[async_trait]
impl RefineBackend for NoRefine {
    async fn refine(
        &self,
        _field: &str,
        _value: &str,
        _candidate: &FragmentMatch,
    ) -> Result<MatchResult, RefineError> {
        Err(RefineError::Disabled)
    }
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a pre-set result or error — useful for testing the reconciler
/// without network access.
pub struct MockRefiner {
    pub reply: Result<MatchResult, String>,
}

impl MockRefiner {
    pub fn returning(result: MatchResult) -> Self {
        MockRefiner { reply: Ok(result) }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        MockRefiner { reply: Err(message.into()) }
    }
}

#[async_trait]
impl RefineBackend for MockRefiner {
    async fn refine(
        &self,
        _field: &str,
        _value: &str,
        _candidate: &FragmentMatch,
    ) -> Result<MatchResult, RefineError> {
        match &self.reply {
            Ok(result) => Ok(result.clone()),
            Err(message) => Err(RefineError::MalformedReply(message.clone())),
        }
    }
}
