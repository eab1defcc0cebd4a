//! Compaction policy and budget state.
//!
//! [`CompactionPolicy`] decides when the rolling conversation must be
//! compacted, expressed as a percentage of the usable budget
//! (`context_window_tokens - reserved_output_tokens`).
//!
//! # Budget states
//!
//! ```text
//! Healthy ──(usage >= threshold)──▶ CompactionDue ──(compact)──▶ Healthy
//!                                        │
//!                                        └─(compaction did not shrink)──▶ hard truncation ──▶ Healthy
//! ```

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Policy controlling when and how much history is compacted.
///
/// Two knobs:
/// - `threshold_percent`: usage (0-100] at which compaction becomes due
/// - `keep_recent`: how many of the newest messages stay raw when compacting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactionPolicy {
    threshold_percent: f64,
    keep_recent: usize,
}

impl CompactionPolicy {
    /// Default compaction threshold (percent of usable budget).
    pub const DEFAULT_THRESHOLD: f64 = 80.0;

    /// Default number of recent messages kept verbatim.
    pub const DEFAULT_KEEP_RECENT: usize = 4;

    /// Create a policy, rejecting thresholds outside (0, 100].
    pub fn try_new(threshold_percent: f64, keep_recent: usize) -> Result<Self, DomainError> {
        if !(threshold_percent > 0.0 && threshold_percent <= 100.0) {
            return Err(DomainError::InvalidThreshold(threshold_percent));
        }
        Ok(Self {
            threshold_percent,
            keep_recent,
        })
    }

    /// Eager preset: compacts early, keeps little raw history.
    pub fn eager() -> Self {
        Self {
            threshold_percent: 60.0,
            keep_recent: 2,
        }
    }

    /// Relaxed preset: lets the window fill further before compacting.
    pub fn relaxed() -> Self {
        Self {
            threshold_percent: 90.0,
            keep_recent: 6,
        }
    }

    // ==================== Accessors ====================

    pub fn threshold_percent(&self) -> f64 {
        self.threshold_percent
    }

    pub fn keep_recent(&self) -> usize {
        self.keep_recent
    }

    // ==================== Builder Methods ====================

    pub fn with_keep_recent(mut self, count: usize) -> Self {
        self.keep_recent = count;
        self
    }

    /// Classify a usage percentage against the threshold.
    pub fn classify(&self, usage_percent: f64) -> BudgetState {
        if usage_percent >= self.threshold_percent {
            BudgetState::CompactionDue
        } else {
            BudgetState::Healthy
        }
    }
}

impl Default for CompactionPolicy {
    /// Default: compact at 80%, keep the 4 newest messages raw.
    fn default() -> Self {
        Self {
            threshold_percent: Self::DEFAULT_THRESHOLD,
            keep_recent: Self::DEFAULT_KEEP_RECENT,
        }
    }
}

/// Budget health of a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetState {
    /// Usage below the compaction threshold
    Healthy,
    /// Usage at or above the threshold; compact before the next model call
    CompactionDue,
}

impl BudgetState {
    pub fn as_str(&self) -> &str {
        match self {
            BudgetState::Healthy => "healthy",
            BudgetState::CompactionDue => "compaction_due",
        }
    }
}

impl std::fmt::Display for BudgetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let policy = CompactionPolicy::default();
        assert_eq!(policy.threshold_percent(), 80.0);
        assert_eq!(policy.keep_recent(), 4);
    }

    #[test]
    fn test_try_new_rejects_out_of_range() {
        assert!(CompactionPolicy::try_new(0.0, 2).is_err());
        assert!(CompactionPolicy::try_new(-5.0, 2).is_err());
        assert!(CompactionPolicy::try_new(100.5, 2).is_err());
        assert!(CompactionPolicy::try_new(f64::NAN, 2).is_err());
        assert!(CompactionPolicy::try_new(100.0, 2).is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        for policy in [CompactionPolicy::eager(), CompactionPolicy::relaxed()] {
            assert!(
                CompactionPolicy::try_new(policy.threshold_percent(), policy.keep_recent())
                    .is_ok()
            );
        }
    }

    #[test]
    fn test_classify_at_threshold_is_due() {
        let policy = CompactionPolicy::default();
        assert_eq!(policy.classify(79.9), BudgetState::Healthy);
        assert_eq!(policy.classify(80.0), BudgetState::CompactionDue);
        assert_eq!(policy.classify(100.0), BudgetState::CompactionDue);
    }

    #[test]
    fn test_builder() {
        let policy = CompactionPolicy::default().with_keep_recent(1);
        assert_eq!(policy.keep_recent(), 1);
    }
}
