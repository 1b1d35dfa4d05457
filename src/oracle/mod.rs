// src/oracle/mod.rs
// =============================================================================
// This module decides whether a page's text is worth keeping.
//
// Submodules:
// - groq: asks an LLM on Groq's OpenAI-compatible API for a YES/NO verdict
//
// The ContentOracle contract is "text in, bool out, never an error". Any
// failure inside an implementation must come back as `false` so a flaky
// API can only make us save less, never crash the crawl.
// =============================================================================

mod groq;

use async_trait::async_trait;

pub use groq::{GroqOracle, GroqSettings, DEFAULT_GROQ_BASE_URL, DEFAULT_MODEL};

/// How much of a page the oracle gets to see.
pub const MAX_ORACLE_INPUT_CHARS: usize = 2000;

#[async_trait]
pub trait ContentOracle: Send + Sync {
    /// Returns true if `text` should be saved.
    async fn classify(&self, text: &str) -> bool;
}

// Keeps the first `max_chars` characters (not bytes, so we never split a
// multi-byte character)
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
