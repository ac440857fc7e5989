//! Token counting capability.
//!
//! Budgeting never guesses lengths itself; it asks a [`Tokenizer`]. The
//! production implementation is [`TiktokenTokenizer`] (cl100k_base, the
//! encoding used by the completion models). [`CharEstimateTokenizer`] is a
//! dependency-free approximation for offline use and tests.

use thiserror::Error;
use tiktoken_rs::CoreBPE;

/// Counts tokens in a piece of text.
pub trait Tokenizer: Send + Sync {
    /// Number of tokens `text` encodes to.
    fn count_tokens(&self, text: &str) -> usize;

    /// Short identifier for logs.
    fn name(&self) -> &str;
}

/// The BPE tables could not be loaded.
#[derive(Error, Debug)]
#[error("failed to load tokenizer: {0}")]
pub struct TokenizerError(pub String);

/// cl100k_base BPE tokenizer.
pub struct TiktokenTokenizer {
    bpe: CoreBPE,
}

impl TiktokenTokenizer {
    /// Load the cl100k_base ranks.
    pub fn cl100k() -> Result<Self, TokenizerError> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| TokenizerError(e.to_string()))?;
        Ok(Self { bpe })
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }

    fn name(&self) -> &str {
        "cl100k_base"
    }
}

/// One token per four characters, rounded up.
#[derive(Debug, Default, Clone, Copy)]
pub struct CharEstimateTokenizer;

impl Tokenizer for CharEstimateTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        text.chars().count().div_ceil(4)
    }

    fn name(&self) -> &str {
        "char-estimate"
    }
}
