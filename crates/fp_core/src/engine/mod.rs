//! Selection-and-staging engine.
//!
//! - `layout`: 원형 배치 (pure)
//! - `outcome`: 당첨자/상품 추첨 (pure, random source 주입)
//! - `sequencer`: 타이머 기반 페이즈 상태 머신
//! - `view`: 참가자별 파생 플래그

pub mod layout;
pub mod outcome;
pub mod phase;
pub mod random;
pub mod scheduler;
pub mod sequencer;
pub mod timing;
pub mod view;

pub use layout::{display_label, position_of, DensityTier, LayoutCache, LayoutTiers, Placement};
pub use outcome::{
    prize_catalog, select_outcome, PrizeEntry, PrizeKind, PrizeRarity, RunOutcome,
    MIN_PARTICIPANTS, PRIZE_CATALOG,
};
pub use phase::{CastingPhase, RunId};
pub use random::{draw_index, FixedSource, RandomSource, SeededSource, SequenceSource};
pub use scheduler::{
    DueTimer, ManualScheduler, PhaseTimer, Scheduler, TimerHandle, TimerQueue, WallClockScheduler,
};
pub use sequencer::{AnimationSequencer, AnimationState, TimerEffect};
pub use timing::PhaseTimings;
pub use view::{entity_view, project, EntityView};
