//! # Conversation context
//!
//! The bounded message history of one session and the policy that keeps it bounded.
//!
//! ## Components
//!
//! - [`ConversationBuffer`] - ordered messages, always headed by exactly one system message
//! - [`BudgetPolicy`] - threshold and keep-count arithmetic for compaction and trimming
//! - [`LengthProxy`] - how "size" is measured: characters (compaction) or words (status, trim)
//! - [`ContextStatus`], [`TrimReport`], [`Compaction`] - reports returned to callers
//!
//! ## Compaction
//!
//! - **Threshold**: after every append, when total characters exceed 75% of the context limit,
//!   keep the system message plus the newest `max(4, limit / 1000)` messages and insert a
//!   "has been summarized" marker right after the system message.
//! - **Periodic**: every 50 completed turns, keep the system message plus the newest
//!   `max(4, len / 4)` messages regardless of size.
//! - **Explicit trim**: keep the newest messages whose cumulative word count, including the
//!   system message, fits a percentage of the context limit.

mod buffer;
mod policy;
mod types;
mod utils;

pub use buffer::ConversationBuffer;
pub use policy::{
    BudgetPolicy, CHARS_PER_KEPT_MESSAGE, CLEANUP_INTERVAL_TURNS, COMPACTION_THRESHOLD_RATIO,
    DEFAULT_TRIM_PERCENTAGE, MIN_KEPT_MESSAGES,
};
pub use types::{Compaction, CompactionKind, ContextStatus, TrimReport};
pub use utils::{count_chars, count_words, LengthProxy};

#[cfg(test)]
mod tests;
