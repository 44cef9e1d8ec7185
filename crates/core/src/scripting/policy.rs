//! Engine replacement policies.
//!
//! A policy decides when the current script engine has accumulated enough
//! internal state (scope pollution, caches) to warrant retirement.
//! [`CountingPolicy`] is the default: a fixed execution-count cadence,
//! blind to script content.

use std::sync::{Mutex, MutexGuard};

/// Decides when the current script engine must be retired.
///
/// `observe` is called once per execution attempt, before the engine is
/// fetched; `should_replace` is consulted by the lifecycle manager during
/// the same attempt. Implementations are shared across request tasks and
/// must serialize their own state.
pub trait ReplacementPolicy: Send + Sync {
    /// Record that an execution is about to occur.
    fn observe(&self, script: &str);

    /// Whether the caller must discard the current engine before
    /// proceeding. Returning `true` consumes the pending window.
    fn should_replace(&self) -> bool;
}

/// Fixed execution-count replacement cadence.
///
/// Every `threshold` observed executions, one replacement fires. The
/// counter is decremented by the threshold on fire rather than zeroed, so
/// observes racing in between an increment and a check stay counted
/// toward the next window.
pub struct CountingPolicy {
    threshold: u64,
    executions: Mutex<u64>,
}

impl CountingPolicy {
    /// Default replacement threshold.
    pub const DEFAULT_THRESHOLD: u64 = 500;

    /// Create a policy firing every `threshold` executions. A zero
    /// threshold is clamped to one.
    pub fn new(threshold: u64) -> Self {
        Self {
            threshold: threshold.max(1),
            executions: Mutex::new(0),
        }
    }

    fn counter(&self) -> MutexGuard<'_, u64> {
        // A poisoned lock still holds a valid count.
        self.executions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for CountingPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

impl ReplacementPolicy for CountingPolicy {
    fn observe(&self, _script: &str) {
        *self.counter() += 1;
    }

    fn should_replace(&self) -> bool {
        let mut count = self.counter();
        if *count >= self.threshold {
            *count -= self.threshold;
            true
        } else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
