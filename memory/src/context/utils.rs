//! Length proxies.
//!
//! Neither proxy is a tokenizer. Compaction measures characters (Unicode scalar values); status
//! and trim measure whitespace-separated words.

use prompt::ChatMessage;
use serde::{Deserialize, Serialize};

/// Number of characters in `text`, counted as Unicode scalar values.
pub fn count_chars(text: &str) -> usize {
    text.chars().count()
}

/// Number of whitespace-separated words in `text`.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Unit used to measure conversation size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthProxy {
    Chars,
    Words,
}

impl LengthProxy {
    pub fn measure(&self, text: &str) -> usize {
        match self {
            LengthProxy::Chars => count_chars(text),
            LengthProxy::Words => count_words(text),
        }
    }

    /// Sum of `measure` over every message's content.
    pub fn total(&self, messages: &[ChatMessage]) -> usize {
        messages.iter().map(|m| self.measure(&m.content)).sum()
    }
}
