//! Animation Sequencer
//!
//! 타이머 기반 페이즈 상태 머신.
//!
//! ## Phase Flow
//! ```text
//! Ready ─start→ Throwing ─500ms→ Waiting ─2500ms→ Catching ─500ms→ Ready
//! ```
//!
//! - Throwing 진입: 이전 결과 제거, `result_visible = false`
//! - Waiting 진입: 전원 캐스팅 (view 에서 파생)
//! - Catching 진입: 당첨자/상품 1회 추첨
//! - Ready 복귀: `result_visible = true`, `is_running = false`
//!
//! Only one timer is pending at a time. Entry actions finish before the next
//! timer is armed. A fired timer is applied only if its run id, handle and
//! target all match the live run; anything else is a stale no-op.

use serde::{Deserialize, Serialize};

use super::outcome::{select_outcome, RunOutcome, MIN_PARTICIPANTS};
use super::phase::{CastingPhase, RunId};
use super::random::RandomSource;
use super::scheduler::{DueTimer, PhaseTimer, Scheduler, TimerHandle};
use super::timing::PhaseTimings;
use crate::error::ContractViolation;
use crate::roster::Roster;

/// Live animation state. One per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AnimationState {
    pub phase: CastingPhase,
    pub is_running: bool,
    pub outcome: Option<RunOutcome>,
    pub result_visible: bool,
}

impl AnimationState {
    pub fn initial() -> Self {
        Self::default()
    }
}

/// What [`AnimationSequencer::on_timer`] did with a fired timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEffect {
    /// Transition applied; the new phase
    Entered(CastingPhase),
    /// Run abandoned because the roster shrank below the draw minimum
    Aborted,
    /// Timer belonged to an old run or an already-left phase
    Stale,
}

#[derive(Debug, Clone)]
pub struct AnimationSequencer {
    state: AnimationState,
    run_id: RunId,
    pending: Option<TimerHandle>,
    timings: PhaseTimings,
    min_participants: usize,
}

impl Default for AnimationSequencer {
    fn default() -> Self {
        Self::new(PhaseTimings::default())
    }
}

impl AnimationSequencer {
    pub fn new(timings: PhaseTimings) -> Self {
        Self {
            state: AnimationState::initial(),
            run_id: RunId::default(),
            pending: None,
            timings,
            min_participants: MIN_PARTICIPANTS,
        }
    }

    /// Raise the roster minimum checked at Catching entry. Values below the
    /// draw minimum of 2 are ignored.
    pub fn with_min_participants(mut self, min: usize) -> Self {
        self.min_participants = min.max(MIN_PARTICIPANTS);
        self
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn phase(&self) -> CastingPhase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn pending_timer(&self) -> Option<TimerHandle> {
        self.pending
    }

    /// Begin a run: allocate a run id, enter Throwing, arm the first timer.
    ///
    /// Returns `Ok(false)` without touching state or timers while a run is
    /// already in flight. If the scheduler refuses the timer the sequencer
    /// falls back to the initial state and the violation is returned.
    pub fn start<S: Scheduler + ?Sized>(
        &mut self,
        scheduler: &mut S,
    ) -> Result<bool, ContractViolation> {
        if self.state.is_running {
            return Ok(false);
        }

        self.run_id = self.run_id.next();
        self.state = AnimationState {
            phase: CastingPhase::Throwing,
            is_running: true,
            outcome: None,
            result_visible: false,
        };
        log::debug!("run {:?}: entered {}", self.run_id, CastingPhase::Throwing.label());

        if let Err(err) = self.arm(scheduler, self.timings.throw_ms, CastingPhase::Waiting) {
            self.reset(scheduler);
            return Err(err);
        }
        Ok(true)
    }

    /// Cancel the pending timer and return to the initial state. A new run id
    /// is allocated so anything already in flight is recognised as stale.
    pub fn reset<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
        self.run_id = self.run_id.next();
        self.state = AnimationState::initial();
    }

    /// Apply a fired timer.
    ///
    /// Catching entry draws from `roster` as it is now. When the roster has
    /// dropped below the minimum since `start`, the run is reset and
    /// [`TimerEffect::Aborted`] returned. Random source or scheduler failures
    /// also reset the run before the violation is returned.
    pub fn on_timer<R, S>(
        &mut self,
        due: &DueTimer,
        roster: &Roster,
        random: &mut R,
        scheduler: &mut S,
    ) -> Result<TimerEffect, ContractViolation>
    where
        R: RandomSource + ?Sized,
        S: Scheduler + ?Sized,
    {
        if !self.is_live(due) {
            log::trace!(
                "dropping stale timer {:?} (run {:?}, live run {:?})",
                due.handle,
                due.timer.run_id,
                self.run_id
            );
            return Ok(TimerEffect::Stale);
        }

        let target = due.timer.target;
        match target {
            // start() is the only way into Throwing
            CastingPhase::Throwing => return Ok(TimerEffect::Stale),
            CastingPhase::Waiting => {
                self.pending = None;
                self.state.phase = CastingPhase::Waiting;
                self.arm_or_reset(scheduler, self.timings.wait_ms, CastingPhase::Catching)?;
            }
            CastingPhase::Catching => {
                self.pending = None;
                if roster.len() < self.min_participants {
                    log::info!(
                        "run {:?}: roster shrank to {} before catching, resetting",
                        self.run_id,
                        roster.len()
                    );
                    self.reset(scheduler);
                    return Ok(TimerEffect::Aborted);
                }
                let outcome = match select_outcome(roster, random) {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        self.reset(scheduler);
                        return Err(err);
                    }
                };
                self.state.phase = CastingPhase::Catching;
                self.state.outcome = Some(outcome);
                self.arm_or_reset(scheduler, self.timings.catch_ms, CastingPhase::Ready)?;
            }
            CastingPhase::Ready => {
                self.pending = None;
                self.state.phase = CastingPhase::Ready;
                self.state.result_visible = true;
                self.state.is_running = false;
                if let Some(outcome) = &self.state.outcome {
                    log::info!("run {:?} finished: {}", self.run_id, outcome.summary());
                }
            }
        }

        log::debug!("run {:?}: entered {}", self.run_id, target.label());
        Ok(TimerEffect::Entered(target))
    }

    fn is_live(&self, due: &DueTimer) -> bool {
        self.state.is_running
            && due.timer.target != CastingPhase::Throwing
            && due.timer.run_id == self.run_id
            && self.pending == Some(due.handle)
            && self.state.phase.next_timed() == Some(due.timer.target)
    }

    fn arm<S: Scheduler + ?Sized>(
        &mut self,
        scheduler: &mut S,
        delay_ms: u64,
        target: CastingPhase,
    ) -> Result<(), ContractViolation> {
        let timer = PhaseTimer { run_id: self.run_id, target };
        let handle = scheduler.schedule_after(delay_ms, timer)?;
        log::debug!(
            "run {:?}: armed {:?} → {} in {}ms",
            self.run_id,
            handle,
            target.label(),
            delay_ms
        );
        self.pending = Some(handle);
        Ok(())
    }

    fn arm_or_reset<S: Scheduler + ?Sized>(
        &mut self,
        scheduler: &mut S,
        delay_ms: u64,
        target: CastingPhase,
    ) -> Result<(), ContractViolation> {
        let armed = self.arm(scheduler, delay_ms, target);
        if armed.is_err() {
            self.reset(scheduler);
        }
        armed
    }
}
