//! timing.rs
//! Phase dwell constants for the casting sequence
//!
//! Ready → Throwing → Waiting → Catching → Ready
//! - Throwing: line leaves the rod
//! - Waiting: every line in the water
//! - Catching: winner reels in

use serde::{Deserialize, Serialize};

/// Throwing → Waiting (ms)
pub const THROW_DWELL_MS: u64 = 500;

/// Waiting → Catching (ms)
pub const WAIT_DWELL_MS: u64 = 2500;

/// Catching → Ready (ms), result becomes visible afterwards
pub const CATCH_DWELL_MS: u64 = 500;

/// Full cycle length with default dwell
pub const FULL_CYCLE_MS: u64 = THROW_DWELL_MS + WAIT_DWELL_MS + CATCH_DWELL_MS;

/// Dwell before each timed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseTimings {
    pub throw_ms: u64,
    pub wait_ms: u64,
    pub catch_ms: u64,
}

impl Default for PhaseTimings {
    fn default() -> Self {
        Self { throw_ms: THROW_DWELL_MS, wait_ms: WAIT_DWELL_MS, catch_ms: CATCH_DWELL_MS }
    }
}

impl PhaseTimings {
    /// 데모/테스트용 최소 대기
    pub fn instant() -> Self {
        Self { throw_ms: 1, wait_ms: 1, catch_ms: 1 }
    }

    pub fn total_ms(&self) -> u64 {
        self.throw_ms.saturating_add(self.wait_ms).saturating_add(self.catch_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings() {
        let timings = PhaseTimings::default();
        assert_eq!(timings.throw_ms, 500);
        assert_eq!(timings.wait_ms, 2500);
        assert_eq!(timings.catch_ms, 500);
        assert_eq!(timings.total_ms(), FULL_CYCLE_MS);
        assert_eq!(FULL_CYCLE_MS, 3500);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let timings: PhaseTimings = serde_json::from_str(r#"{"wait_ms": 1000}"#).unwrap();
        assert_eq!(timings.throw_ms, THROW_DWELL_MS);
        assert_eq!(timings.wait_ms, 1000);
        assert_eq!(timings.catch_ms, CATCH_DWELL_MS);
    }
}
