//! Error types for the request path.
//!
//! Infrastructure adapters (cache, vector store, embedding runtime, audit
//! sink) define their own error enums next to their implementations; this
//! module holds the errors that travel through the routing pipeline itself.

use std::time::Duration;

use thiserror::Error;

use crate::classifier::ClassifierError;
use crate::retry::Retryable;

/// Errors raised by a provider client for a single completion attempt.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Provider answered with a non-2xx status.
    #[error("provider returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },

    /// The 30 s request deadline expired.
    #[error("provider request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection-level failure before a status was received.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The provider answered 2xx but the body did not match the expected shape.
    #[error("failed to parse provider response: {0}")]
    Parse(String),

    /// The caller cancelled the request.
    #[error("request cancelled by caller")]
    Cancelled,
}

impl Retryable for LlmError {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::Provider { .. } | LlmError::Timeout(_) | LlmError::Transport(_)
        )
    }
}

/// Errors surfaced by the router orchestrator for a whole request.
#[derive(Debug, Error)]
pub enum RouterError {
    /// `forceModel` named a model the active provider does not know.
    #[error("unknown model '{0}' for the active provider")]
    UnknownModel(String),

    /// Filtering and breaker admission excluded every model.
    #[error("no models available after filtering and circuit admission")]
    NoModelsAvailable,

    /// Every candidate in the fallback chain failed.
    #[error("all {attempted} candidate models failed; last error: {last_error}")]
    AllModelsFailed { attempted: usize, last_error: String },

    /// The classifier could not produce a result.
    #[error("classification failed: {0}")]
    Classifier(#[from] ClassifierError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_timeout_and_transport_are_retryable() {
        assert!(LlmError::Provider {
            status: 503,
            message: "overloaded".into()
        }
        .is_retryable());
        assert!(LlmError::Timeout(Duration::from_secs(30)).is_retryable());
        assert!(LlmError::Transport("connection reset".into()).is_retryable());
    }

    #[test]
    fn cancellation_and_parse_failures_are_not_retryable() {
        assert!(!LlmError::Cancelled.is_retryable());
        assert!(!LlmError::Parse("missing choices".into()).is_retryable());
    }

    #[test]
    fn all_failed_message_is_distinguishable_from_single_model_errors() {
        let err = RouterError::AllModelsFailed {
            attempted: 2,
            last_error: "HTTP 500".into(),
        };
        assert!(err.to_string().contains("all 2 candidate models failed"));
    }
}
