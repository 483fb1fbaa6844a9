//! Budget arithmetic.
//!
//! Pure functions of the context limit; the buffer decides when to call them.

use serde::{Deserialize, Serialize};

/// Fraction of the context limit the character total may reach before compaction.
pub const COMPACTION_THRESHOLD_RATIO: f64 = 0.75;
/// Lower bound on messages kept by either compaction trigger.
pub const MIN_KEPT_MESSAGES: usize = 4;
/// Threshold compaction keeps one message per this many units of context limit.
pub const CHARS_PER_KEPT_MESSAGE: usize = 1000;
/// Completed turns between periodic cleanups.
pub const CLEANUP_INTERVAL_TURNS: usize = 50;
/// Trim target used when the caller gives none.
pub const DEFAULT_TRIM_PERCENTAGE: f64 = 50.0;

/// Context budget for one conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetPolicy {
    context_limit: usize,
}

impl BudgetPolicy {
    /// Creates a policy; a zero limit is raised to 1 so percentages stay finite.
    pub fn new(context_limit: usize) -> Self {
        Self {
            context_limit: context_limit.max(1),
        }
    }

    pub fn context_limit(&self) -> usize {
        self.context_limit
    }

    /// Size above which threshold compaction fires.
    pub fn threshold(&self) -> f64 {
        self.context_limit as f64 * COMPACTION_THRESHOLD_RATIO
    }

    /// True when `total` strictly exceeds the threshold.
    pub fn exceeds_threshold(&self, total: usize) -> bool {
        total as f64 > self.threshold()
    }

    /// Messages kept after the system message by threshold compaction.
    pub fn threshold_keep_count(&self) -> usize {
        MIN_KEPT_MESSAGES.max(self.context_limit / CHARS_PER_KEPT_MESSAGE)
    }

    /// Messages kept after the system message by periodic cleanup of a `len`-message buffer.
    pub fn periodic_keep_count(&self, len: usize) -> usize {
        MIN_KEPT_MESSAGES.max(len / 4)
    }

    /// Whether periodic cleanup is due.
    pub fn cleanup_due(&self, turns: usize, last_cleanup: usize) -> bool {
        turns.saturating_sub(last_cleanup) >= CLEANUP_INTERVAL_TURNS
    }

    /// Target size for an explicit trim. The percentage is not range-checked.
    pub fn target_tokens(&self, target_percentage: f64) -> f64 {
        self.context_limit as f64 * target_percentage / 100.0
    }

    pub fn usage_percentage(&self, total: usize) -> f64 {
        total as f64 * 100.0 / self.context_limit as f64
    }
}
