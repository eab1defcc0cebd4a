//! Orchestration parameters: loop bounds, caps and timeouts.
//!
//! [`OrchestrationParams`] groups the static parameters that control the
//! plan → code → test → review cycle in
//! [`OrchestrateUseCase`](crate::use_cases::orchestrate::OrchestrateUseCase).

use foundry_domain::CompactionPolicy;
use foundry_domain::context::summary::DEFAULT_FALLBACK_CHARS;
use std::time::Duration;

/// Run loop control parameters.
///
/// | Counter | Scope | Exhaustion |
/// |---------|-------|------------|
/// | `max_task_retries` | per task | task marked `failed`, run continues |
/// | `max_review_reworks` | per run | run ends `Blocked` |
#[derive(Debug, Clone)]
pub struct OrchestrationParams {
    /// Coder/Tester attempts per task (total, not additional).
    pub max_task_retries: u32,
    /// Rework rounds after a rejected review.
    pub max_review_reworks: u32,
    /// Characters of each file shown to the tester and reviewer.
    pub review_file_char_cap: usize,
    /// Bound on each model round trip.
    pub call_timeout: Duration,
    /// When history is compacted and how much stays raw.
    pub compaction: CompactionPolicy,
    /// Characters kept per message by the non-model summary fallback.
    pub fallback_chars_per_message: usize,
    /// Run the reviewer's quick check on each task's files before testing.
    pub quick_check: bool,
}

impl Default for OrchestrationParams {
    fn default() -> Self {
        Self {
            max_task_retries: 3,
            max_review_reworks: 2,
            review_file_char_cap: 3000,
            call_timeout: Duration::from_secs(300),
            compaction: CompactionPolicy::default(),
            fallback_chars_per_message: DEFAULT_FALLBACK_CHARS,
            quick_check: false,
        }
    }
}

impl OrchestrationParams {
    // ==================== Builder Methods ====================

    pub fn with_max_task_retries(mut self, max: u32) -> Self {
        self.max_task_retries = max;
        self
    }

    pub fn with_max_review_reworks(mut self, max: u32) -> Self {
        self.max_review_reworks = max;
        self
    }

    pub fn with_review_file_char_cap(mut self, cap: usize) -> Self {
        self.review_file_char_cap = cap;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_compaction(mut self, policy: CompactionPolicy) -> Self {
        self.compaction = policy;
        self
    }

    pub fn with_fallback_chars_per_message(mut self, chars: usize) -> Self {
        self.fallback_chars_per_message = chars;
        self
    }

    pub fn with_quick_check(mut self, enabled: bool) -> Self {
        self.quick_check = enabled;
        self
    }
}
