//! Token-budget history truncation.
//!
//! Keeps the longest suffix of the conversation that fits a model's token
//! ceiling after paying for the fixed system prompt and reserving room for
//! the answer. The newest message is all-or-nothing: it is never split and
//! never dropped in favour of older turns.

use edgechat_types::Message;
use thiserror::Error;
use tracing::debug;

use crate::tokenizer::Tokenizer;

/// Why a conversation could not be fitted into the budget.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TruncateError {
    /// The newest message plus the reserved headroom exceeds the limit.
    #[error(
        "This message exceeds the model's maximum token limit of {limit}. Please shorten your message."
    )]
    LimitExceeded {
        /// The model's token ceiling.
        limit: usize,
    },

    /// There was nothing to send.
    #[error("no messages to send")]
    NoMessages,
}

/// The selected suffix and what it costs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncation {
    /// Kept messages in chronological order.
    pub messages: Vec<Message>,
    /// Tokens of the fixed prompt plus every kept message.
    pub used_tokens: usize,
}

/// Greedy newest-first history selection.
pub struct TokenBudgetTruncator<'a> {
    tokenizer: &'a dyn Tokenizer,
}

impl<'a> TokenBudgetTruncator<'a> {
    /// Create a truncator counting with `tokenizer`.
    pub fn new(tokenizer: &'a dyn Tokenizer) -> Self {
        Self { tokenizer }
    }

    /// Select the messages to send.
    ///
    /// A message is kept while `used + its tokens + reserved <= limit`;
    /// the walk stops at the first message that would overflow, so older
    /// turns are dropped and never reordered. `messages` is not modified.
    pub fn truncate(
        &self,
        messages: &[Message],
        fixed_prompt: &str,
        token_limit: usize,
        reserved_tokens: usize,
    ) -> Result<Truncation, TruncateError> {
        let (newest, older) = messages.split_last().ok_or(TruncateError::NoMessages)?;

        let baseline = self.tokenizer.count_tokens(fixed_prompt);
        let newest_tokens = self.tokenizer.count_tokens(&newest.content);
        if newest_tokens + reserved_tokens > token_limit {
            debug!(
                newest_tokens,
                reserved_tokens, token_limit, "newest message alone exceeds budget"
            );
            return Err(TruncateError::LimitExceeded { limit: token_limit });
        }

        let mut used = baseline + newest_tokens;
        let mut kept_rev = vec![newest.clone()];

        for message in older.iter().rev() {
            let tokens = self.tokenizer.count_tokens(&message.content);
            if used + tokens + reserved_tokens > token_limit {
                break;
            }
            used += tokens;
            kept_rev.push(message.clone());
        }

        kept_rev.reverse();
        debug!(
            tokenizer = self.tokenizer.name(),
            kept = kept_rev.len(),
            dropped = messages.len() - kept_rev.len(),
            used_tokens = used,
            "history truncated to budget"
        );

        Ok(Truncation {
            messages: kept_rev,
            used_tokens: used,
        })
    }
}
