//! Unit tests for `BudgetPolicy`.

use crate::context::BudgetPolicy;

#[test]
fn test_threshold_is_three_quarters() {
    let p = BudgetPolicy::new(100);
    assert_eq!(p.threshold(), 75.0);
    assert!(!p.exceeds_threshold(75));
    assert!(p.exceeds_threshold(76));
}

#[test]
fn test_threshold_keep_count() {
    assert_eq!(BudgetPolicy::new(100).threshold_keep_count(), 4);
    assert_eq!(BudgetPolicy::new(5000).threshold_keep_count(), 5);
    assert_eq!(BudgetPolicy::new(12_345).threshold_keep_count(), 12);
}

#[test]
fn test_periodic_keep_count() {
    let p = BudgetPolicy::new(5000);
    assert_eq!(p.periodic_keep_count(8), 4);
    assert_eq!(p.periodic_keep_count(40), 10);
    assert_eq!(p.periodic_keep_count(101), 25);
}

#[test]
fn test_cleanup_due_every_fifty_turns() {
    let p = BudgetPolicy::new(5000);
    assert!(!p.cleanup_due(49, 0));
    assert!(p.cleanup_due(50, 0));
    assert!(!p.cleanup_due(99, 50));
    assert!(p.cleanup_due(100, 50));
}

#[test]
fn test_target_and_usage() {
    let p = BudgetPolicy::new(1000);
    assert_eq!(p.target_tokens(50.0), 500.0);
    assert_eq!(p.target_tokens(150.0), 1500.0);
    assert_eq!(p.usage_percentage(250), 25.0);
}

#[test]
fn test_zero_limit_is_raised() {
    let p = BudgetPolicy::new(0);
    assert_eq!(p.context_limit(), 1);
    assert!(p.usage_percentage(1).is_finite());
}
