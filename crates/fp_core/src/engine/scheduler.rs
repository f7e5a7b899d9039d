//! Timer Scheduler
//!
//! 페이즈 전환 타이머를 예약/취소하는 추상화.
//!
//! ## 핵심 개념
//! - **PhaseTimer**: 어떤 run 에서 어느 페이즈로 넘어갈지 (payload)
//! - **TimerHandle**: 취소용 핸들
//! - **Scheduler**: 예약, 취소, 만기 타이머 수거
//!
//! Schedulers never call back into the engine. The host pulls due timers
//! with [`Scheduler::take_due`] and hands them to the session, so every
//! transition runs on the caller's thread.
//!
//! ```text
//! schedule_after(500, timer) → handle
//! ... time passes ...
//! take_due() → [DueTimer { handle, timer, due_at_ms }]
//! ```

use std::collections::BTreeMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::phase::{CastingPhase, RunId};
use crate::error::ContractViolation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

/// Transition a timer will request when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhaseTimer {
    pub run_id: RunId,
    pub target: CastingPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DueTimer {
    pub handle: TimerHandle,
    pub timer: PhaseTimer,
    pub due_at_ms: u64,
}

pub trait Scheduler {
    /// Milliseconds on this scheduler's clock.
    fn now_ms(&self) -> u64;

    /// Arm `timer` to come due `delay_ms` from now.
    fn schedule_after(
        &mut self,
        delay_ms: u64,
        timer: PhaseTimer,
    ) -> Result<TimerHandle, ContractViolation>;

    /// Drop a pending timer. Returns `false` if it already fired or was
    /// never armed.
    fn cancel(&mut self, handle: TimerHandle) -> bool;

    /// Remove and return every timer due at or before `now_ms()`, earliest
    /// first (ties in arming order).
    fn take_due(&mut self) -> Vec<DueTimer>;

    fn pending(&self) -> usize;
}

impl<T: Scheduler + ?Sized> Scheduler for Box<T> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }

    fn schedule_after(
        &mut self,
        delay_ms: u64,
        timer: PhaseTimer,
    ) -> Result<TimerHandle, ContractViolation> {
        (**self).schedule_after(delay_ms, timer)
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        (**self).cancel(handle)
    }

    fn take_due(&mut self) -> Vec<DueTimer> {
        (**self).take_due()
    }

    fn pending(&self) -> usize {
        (**self).pending()
    }
}

/// Pending timers ordered by (due time, handle).
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    entries: BTreeMap<(u64, TimerHandle), PhaseTimer>,
    next_handle: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        now_ms: u64,
        delay_ms: u64,
        timer: PhaseTimer,
    ) -> Result<TimerHandle, ContractViolation> {
        let due_at = now_ms.checked_add(delay_ms).ok_or_else(|| {
            ContractViolation::SchedulerRejected {
                reason: format!("deadline overflow: now={} delay={}", now_ms, delay_ms),
            }
        })?;
        let handle = TimerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.entries.insert((due_at, handle), timer);
        Ok(handle)
    }

    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let key = self.entries.keys().find(|(_, h)| *h == handle).copied();
        match key {
            Some(key) => self.entries.remove(&key).is_some(),
            None => false,
        }
    }

    pub fn take_due(&mut self, now_ms: u64) -> Vec<DueTimer> {
        let later = self.entries.split_off(&(now_ms.saturating_add(1), TimerHandle(0)));
        let due = std::mem::replace(&mut self.entries, later);
        due.into_iter()
            .map(|((due_at_ms, handle), timer)| DueTimer { handle, timer, due_at_ms })
            .collect()
    }

    pub fn next_due_ms(&self) -> Option<u64> {
        self.entries.keys().next().map(|(due, _)| *due)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Virtual clock. Time only moves through [`ManualScheduler::advance_to`]
/// and [`ManualScheduler::advance`].
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    queue: TimerQueue,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward to `ms`. Moving backwards is ignored.
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }

    pub fn advance(&mut self, elapsed_ms: u64) {
        self.now_ms = self.now_ms.saturating_add(elapsed_ms);
    }

    pub fn next_due_ms(&self) -> Option<u64> {
        self.queue.next_due_ms()
    }
}

impl Scheduler for ManualScheduler {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn schedule_after(
        &mut self,
        delay_ms: u64,
        timer: PhaseTimer,
    ) -> Result<TimerHandle, ContractViolation> {
        self.queue.insert(self.now_ms, delay_ms, timer)
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.queue.cancel(handle)
    }

    fn take_due(&mut self) -> Vec<DueTimer> {
        self.queue.take_due(self.now_ms)
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}

/// Monotonic wall clock measured from construction.
#[derive(Debug, Clone)]
pub struct WallClockScheduler {
    origin: Instant,
    queue: TimerQueue,
}

impl Default for WallClockScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClockScheduler {
    pub fn new() -> Self {
        Self { origin: Instant::now(), queue: TimerQueue::new() }
    }

    /// Milliseconds until the earliest pending timer, `None` when idle.
    pub fn until_next_due_ms(&self) -> Option<u64> {
        self.queue.next_due_ms().map(|due| due.saturating_sub(self.now_ms()))
    }
}

impl Scheduler for WallClockScheduler {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn schedule_after(
        &mut self,
        delay_ms: u64,
        timer: PhaseTimer,
    ) -> Result<TimerHandle, ContractViolation> {
        let now = self.now_ms();
        self.queue.insert(now, delay_ms, timer)
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.queue.cancel(handle)
    }

    fn take_due(&mut self) -> Vec<DueTimer> {
        let now = self.now_ms();
        self.queue.take_due(now)
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer(run: u64, target: CastingPhase) -> PhaseTimer {
        PhaseTimer { run_id: RunId(run), target }
    }

    #[test]
    fn test_manual_timer_fires_at_exact_deadline() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule_after(500, timer(1, CastingPhase::Waiting)).unwrap();

        scheduler.advance(499);
        assert!(scheduler.take_due().is_empty());

        scheduler.advance(1);
        let due = scheduler.take_due();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].handle, handle);
        assert_eq!(due[0].due_at_ms, 500);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule_after(500, timer(1, CastingPhase::Waiting)).unwrap();
        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));

        scheduler.advance(10_000);
        assert!(scheduler.take_due().is_empty());
    }

    #[test]
    fn test_due_order_by_deadline_then_arming() {
        let mut scheduler = ManualScheduler::new();
        let late = scheduler.schedule_after(300, timer(1, CastingPhase::Ready)).unwrap();
        let early_a = scheduler.schedule_after(100, timer(1, CastingPhase::Waiting)).unwrap();
        let early_b = scheduler.schedule_after(100, timer(2, CastingPhase::Waiting)).unwrap();

        scheduler.advance(1000);
        let handles: Vec<_> = scheduler.take_due().iter().map(|d| d.handle).collect();
        assert_eq!(handles, vec![early_a, early_b, late]);
    }

    #[test]
    fn test_take_due_leaves_future_timers() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule_after(100, timer(1, CastingPhase::Waiting)).unwrap();
        scheduler.schedule_after(200, timer(1, CastingPhase::Catching)).unwrap();

        scheduler.advance(150);
        assert_eq!(scheduler.take_due().len(), 1);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.next_due_ms(), Some(200));
    }

    #[test]
    fn test_queue_drains_in_deadline_order() {
        let mut queue = TimerQueue::new();
        assert!(queue.is_empty());
        let late = queue.insert(0, 300, timer(1, CastingPhase::Ready)).unwrap();
        let early = queue.insert(0, 100, timer(1, CastingPhase::Waiting)).unwrap();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.next_due_ms(), Some(100));

        let due: Vec<_> = queue.take_due(300).iter().map(|d| d.handle).collect();
        assert_eq!(due, vec![early, late]);
        assert!(queue.is_empty());
        assert_eq!(queue.next_due_ms(), None);
    }

    #[test]
    fn test_deadline_overflow_is_rejected() {
        let mut scheduler = ManualScheduler::new();
        scheduler.advance(10);
        let err = scheduler.schedule_after(u64::MAX, timer(1, CastingPhase::Waiting)).unwrap_err();
        assert!(matches!(err, ContractViolation::SchedulerRejected { .. }));
    }

    #[test]
    fn test_advance_to_never_rewinds() {
        let mut scheduler = ManualScheduler::new();
        scheduler.advance_to(300);
        scheduler.advance_to(100);
        assert_eq!(scheduler.now_ms(), 300);
    }
}
