//! Embedding runtime abstraction plus prompt fingerprinting and token
//! estimation.
//!
//! The runtime is a process-wide singleton: constructed and warmed exactly
//! once at boot, then shared behind an `Arc` by every request.

pub mod fastembed;

use async_trait::async_trait;
use thiserror::Error;

pub use self::fastembed::FastembedRuntime;

/// Errors from the embedding runtime.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding model load failed: {0}")]
    ModelLoad(String),

    #[error("embedding inference failed: {0}")]
    Inference(String),
}

/// Turns text into a fixed-dimension unit vector.
#[async_trait]
pub trait EmbeddingRuntime: Send + Sync {
    /// Embed one text. The output length equals [`EmbeddingRuntime::dimension`].
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Output dimension of the model.
    fn dimension(&self) -> usize;
}

/// Rough token estimate: four characters per token, rounded up.
pub fn estimate_tokens(text: &str) -> u32 {
    (text.len() as f32 / 4.0).ceil() as u32
}

/// Fast non-cryptographic fingerprint of a prompt.
///
/// Hashes the lowercased, trimmed prompt with fixed seeds so the value is
/// stable across processes sharing a cache. Used only as a cache key, never
/// for integrity.
pub fn fingerprint(prompt: &str) -> u64 {
    use std::hash::BuildHasher;

    let normalized = prompt.trim().to_lowercase();
    ahash::RandomState::with_seeds(
        0x9e37_79b9_7f4a_7c15,
        0x6a09_e667_f3bc_c908,
        0xbb67_ae85_84ca_a73b,
        0x3c6e_f372_fe94_f82b,
    )
    .hash_one(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_rounds_up_at_four_chars_per_token() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
        assert_eq!(estimate_tokens(&"a".repeat(1000)), 250);
    }

    #[test]
    fn fingerprint_normalizes_case_and_whitespace() {
        assert_eq!(fingerprint("Hello World"), fingerprint("  hello world  "));
        assert_ne!(fingerprint("hello world"), fingerprint("hello worlds"));
    }

    #[test]
    fn fingerprint_is_stable() {
        // Same input, same process, same value; the fixed seeds also pin the
        // value across processes sharing a cache.
        let a = fingerprint("classify me");
        let b = fingerprint("classify me");
        assert_eq!(a, b);
    }
}
