//! Reports produced by the conversation buffer.

use serde::{Deserialize, Serialize};

/// Word-count usage of the buffer against the context limit.
///
/// Field names match the `/api/context/status` payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextStatus {
    pub total_tokens: usize,
    pub context_limit: usize,
    pub usage_percentage: f64,
}

/// Outcome of an explicit trim-to-target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimReport {
    /// Messages left in the buffer, system message included.
    pub remaining_messages: usize,
    pub current_usage_percentage: f64,
}

/// Which trigger dropped messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompactionKind {
    /// Character total crossed the threshold on append.
    Threshold,
    /// Turn counter reached the cleanup interval.
    Periodic,
}

/// A compaction that actually ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compaction {
    pub kind: CompactionKind,
    /// Buffer length before compaction.
    pub before: usize,
    /// Buffer length after compaction, marker included.
    pub after: usize,
    /// Whether a "has been summarized" marker was inserted.
    pub marker_inserted: bool,
}
