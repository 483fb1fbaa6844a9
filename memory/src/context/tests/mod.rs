//! Unit tests for the context module.
//!
//! ## Coverage
//!
//! | Component            | File              | Covered API / behaviour |
//! |----------------------|-------------------|-------------------------|
//! | `count_*`, `LengthProxy` | utils_test.rs | Character and word counting, totals over messages |
//! | `BudgetPolicy`       | policy_test.rs    | Threshold, keep counts, cleanup interval, percentages |
//! | `ConversationBuffer` | buffer_test.rs    | Head invariant, prefixing, threshold and periodic compaction, trim, status, reset |

mod policy_test;
