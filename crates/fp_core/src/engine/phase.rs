//! Casting Phase
//!
//! 낚시 연출의 4단계 페이즈.
//! - Ready: 대기 (시작 명령만 받음)
//! - Throwing: 낚싯대 던지는 중
//! - Waiting: 모든 참가자 찌 드리운 상태
//! - Catching: 당첨자가 물고기를 낚는 중

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CastingPhase {
    #[default]
    Ready,
    Throwing,
    Waiting,
    Catching,
}

impl CastingPhase {
    /// Phase entered when this phase's dwell timer fires.
    ///
    /// `Ready` is idle and only leaves through `start`.
    pub fn next_timed(&self) -> Option<CastingPhase> {
        match self {
            CastingPhase::Ready => None,
            CastingPhase::Throwing => Some(CastingPhase::Waiting),
            CastingPhase::Waiting => Some(CastingPhase::Catching),
            CastingPhase::Catching => Some(CastingPhase::Ready),
        }
    }

    /// 이 페이즈에서 모든 참가자가 찌를 드리우고 있는지
    pub fn is_casting(&self) -> bool {
        matches!(self, CastingPhase::Waiting)
    }

    pub fn label(&self) -> &'static str {
        match self {
            CastingPhase::Ready => "ready",
            CastingPhase::Throwing => "throwing",
            CastingPhase::Waiting => "waiting",
            CastingPhase::Catching => "catching",
        }
    }
}

/// Monotonic run identifier. Every `start` and every `reset` allocates a new
/// one; timers carry the id they were armed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct RunId(pub u64);

impl RunId {
    pub fn next(self) -> RunId {
        RunId(self.0.wrapping_add(1))
    }
}
