//! Session Controller
//!
//! 로스터, 레이아웃, 추첨, 시퀀서를 하나로 묶는 세션 관리자.
//! 외부 명령은 모두 여기를 통과하며, 상태가 바뀔 때마다 스냅샷을 다시
//! 만들어 리스너에게 전달합니다.
//!
//! Expected edge cases come back as [`CommandOutcome::Ignored`]; a broken
//! random source or scheduler comes back as `Err(ContractViolation)`.

mod snapshot;

pub use snapshot::{ParticipantView, SessionSnapshot};

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::engine::layout::LayoutCache;
use crate::engine::outcome::{RunOutcome, MIN_PARTICIPANTS};
use crate::engine::random::{RandomSource, SeededSource};
use crate::engine::scheduler::{ManualScheduler, Scheduler, WallClockScheduler};
use crate::engine::sequencer::{AnimationSequencer, AnimationState, TimerEffect};
use crate::error::ContractViolation;
use crate::roster::Roster;

/// Why a command left the session untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IgnoreReason {
    EmptyName,
    DuplicateName,
    NothingAdded,
    NameNotFound,
    NotEnoughParticipants,
    AlreadyRunning,
    NoOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandOutcome {
    Applied,
    /// Bulk add appended this many names
    Added(usize),
    Ignored(IgnoreReason),
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, CommandOutcome::Ignored(_))
    }
}

pub type SnapshotListener = Box<dyn FnMut(&SessionSnapshot) + Send>;

/// Interactive session over the wall clock.
pub type LiveSession = SessionController<SeededSource, WallClockScheduler>;

/// Virtual-clock session for tests and simulation.
pub type ManualSession<R> = SessionController<R, ManualScheduler>;

pub struct SessionController<R: RandomSource, S: Scheduler> {
    config: SessionConfig,
    roster: Roster,
    layout: LayoutCache,
    sequencer: AnimationSequencer,
    random: R,
    scheduler: S,
    snapshot: SessionSnapshot,
    listeners: Vec<SnapshotListener>,
}

impl<R: RandomSource, S: Scheduler> std::fmt::Debug for SessionController<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("roster", &self.roster)
            .field("state", self.sequencer.state())
            .field("revision", &self.snapshot.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl LiveSession {
    /// Wall-clock session seeded from `config.seed`, or entropy.
    pub fn live(config: SessionConfig) -> Self {
        let random = SeededSource::from_optional_seed(config.seed);
        Self::new(config, random, WallClockScheduler::new())
    }
}

impl<R: RandomSource, S: Scheduler> SessionController<R, S> {
    /// `config.min_participants` below 2 is raised to 2.
    pub fn new(mut config: SessionConfig, random: R, scheduler: S) -> Self {
        if config.min_participants < MIN_PARTICIPANTS {
            log::warn!(
                "min_participants {} raised to {}",
                config.min_participants,
                MIN_PARTICIPANTS
            );
            config.min_participants = MIN_PARTICIPANTS;
        }
        let sequencer =
            AnimationSequencer::new(config.timings).with_min_participants(config.min_participants);
        let mut layout = LayoutCache::new(config.layout);
        let snapshot = SessionSnapshot::build(
            0,
            &Roster::new(),
            sequencer.state(),
            &mut layout,
            config.min_participants,
        );
        Self {
            config,
            roster: Roster::new(),
            layout,
            sequencer,
            random,
            scheduler,
            snapshot,
            listeners: Vec::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn state(&self) -> &AnimationState {
        self.sequencer.state()
    }

    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.sequencer.state().outcome.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.sequencer.is_running()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Called with every snapshot published from now on.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&SessionSnapshot) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    // ========================
    // Roster commands
    // ========================

    pub fn add_name(&mut self, name: &str) -> CommandOutcome {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return CommandOutcome::Ignored(IgnoreReason::EmptyName);
        }
        if !self.roster.add(trimmed) {
            return CommandOutcome::Ignored(IgnoreReason::DuplicateName);
        }
        log::info!("added '{}' ({} participants)", trimmed, self.roster.len());
        self.publish();
        CommandOutcome::Applied
    }

    pub fn add_bulk(&mut self, raw: &str) -> CommandOutcome {
        let added = self.roster.add_bulk(raw);
        if added == 0 {
            return CommandOutcome::Ignored(IgnoreReason::NothingAdded);
        }
        log::info!("bulk added {} names ({} participants)", added, self.roster.len());
        self.publish();
        CommandOutcome::Added(added)
    }

    /// Remove a name. Removing the current winner also clears the outcome.
    pub fn remove_name(&mut self, name: &str) -> CommandOutcome {
        if !self.roster.remove(name) {
            return CommandOutcome::Ignored(IgnoreReason::NameNotFound);
        }
        log::info!("removed '{}' ({} participants)", name, self.roster.len());
        if self.outcome().is_some_and(|o| o.winner_name == name) {
            self.sequencer.reset(&mut self.scheduler);
        }
        self.publish();
        CommandOutcome::Applied
    }

    // ========================
    // Draw commands
    // ========================

    pub fn start(&mut self) -> Result<CommandOutcome, ContractViolation> {
        if self.roster.len() < self.config.min_participants {
            return Ok(CommandOutcome::Ignored(IgnoreReason::NotEnoughParticipants));
        }
        if self.sequencer.is_running() {
            return Ok(CommandOutcome::Ignored(IgnoreReason::AlreadyRunning));
        }

        let started = self.sequencer.start(&mut self.scheduler);
        match started {
            Ok(true) => {
                log::info!(
                    "run {:?} started with {} participants",
                    self.sequencer.run_id(),
                    self.roster.len()
                );
                self.publish();
                Ok(CommandOutcome::Applied)
            }
            Ok(false) => Ok(CommandOutcome::Ignored(IgnoreReason::AlreadyRunning)),
            Err(err) => {
                log::warn!("start failed: {}", err);
                self.publish();
                Err(err)
            }
        }
    }

    /// Cancel any pending timer and clear the animation state. The roster is
    /// left alone.
    pub fn reset(&mut self) -> CommandOutcome {
        self.sequencer.reset(&mut self.scheduler);
        self.publish();
        CommandOutcome::Applied
    }

    pub fn remove_winner(&mut self) -> CommandOutcome {
        let Some(winner) = self.outcome().map(|o| o.winner_name.clone()) else {
            return CommandOutcome::Ignored(IgnoreReason::NoOutcome);
        };
        self.roster.remove(&winner);
        log::info!("removed winner '{}' ({} participants)", winner, self.roster.len());
        self.reset()
    }

    // ========================
    // Time
    // ========================

    /// Deliver every timer the scheduler reports as due. Returns how many
    /// transitions were applied (stale timers are not counted).
    pub fn pump(&mut self) -> Result<usize, ContractViolation> {
        let mut applied = 0;
        loop {
            let due = self.scheduler.take_due();
            if due.is_empty() {
                break;
            }
            for timer in due {
                let effect = self.sequencer.on_timer(
                    &timer,
                    &self.roster,
                    &mut self.random,
                    &mut self.scheduler,
                );
                match effect {
                    Ok(TimerEffect::Stale) => {}
                    Ok(TimerEffect::Entered(_)) | Ok(TimerEffect::Aborted) => {
                        applied += 1;
                        self.publish();
                    }
                    Err(err) => {
                        log::warn!("timer {:?} failed: {}", timer.handle, err);
                        self.publish();
                        return Err(err);
                    }
                }
            }
        }
        Ok(applied)
    }

    fn publish(&mut self) {
        self.snapshot = SessionSnapshot::build(
            self.snapshot.revision.wrapping_add(1),
            &self.roster,
            self.sequencer.state(),
            &mut self.layout,
            self.config.min_participants,
        );
        for listener in self.listeners.iter_mut() {
            listener(&self.snapshot);
        }
    }
}

impl<R: RandomSource> SessionController<R, ManualScheduler> {
    /// Move the virtual clock forward by `elapsed_ms`, stopping at each due
    /// time on the way so timers armed during the advance fire on schedule.
    pub fn advance(&mut self, elapsed_ms: u64) -> Result<usize, ContractViolation> {
        let target = self.scheduler.now_ms().saturating_add(elapsed_ms);
        let mut applied = 0;
        while let Some(due) = self.scheduler.next_due_ms() {
            if due > target {
                break;
            }
            self.scheduler.advance_to(due);
            applied += self.pump()?;
        }
        self.scheduler.advance_to(target);
        Ok(applied)
    }

    /// Advance until the current run finishes (or nothing is pending).
    pub fn run_to_completion(&mut self) -> Result<usize, ContractViolation> {
        let mut applied = 0;
        while let Some(due) = self.scheduler.next_due_ms() {
            let step = due.saturating_sub(self.scheduler.now_ms());
            applied += self.advance(step)?;
        }
        Ok(applied)
    }
}
