// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling

use crate::config::ClockConfig;
use crate::error::ClockError;
use crate::timer::VirtualTimer;
use chrono::{DateTime, FixedOffset, Offset, TimeDelta, Utc};
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};

/// A clock that provides the current time
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
    /// Monotonic counter in [`TIMESTAMP_FREQUENCY`] units per second.
    fn timestamp(&self) -> i64;
}

/// Ticks per second reported by [`Clock::timestamp`] (nanoseconds).
pub const TIMESTAMP_FREQUENCY: i64 = 1_000_000_000;

/// Manually advanced clock that fires its timers synchronously.
///
/// Time moves only through [`advance_by`](Self::advance_by) and
/// [`advance_to`](Self::advance_to). Every timer due on the way is fired on the
/// caller's thread, earliest first; timers due at the same instant fire in
/// creation order. Callbacks may create, change or dispose timers and may even
/// advance the clock again.
///
/// Clones share the same time and timers.
#[derive(Clone)]
pub struct VirtualClock {
    shared: Arc<ClockShared>,
}

pub(crate) struct ClockShared {
    start: DateTime<Utc>,
    display_offset: FixedOffset,
    state: Mutex<ClockState>,
}

struct ClockState {
    current: DateTime<Utc>,
    timers: Vec<VirtualTimer>,
    /// Set while a batch of timers is firing; compaction waits until it clears.
    advancing: bool,
}

impl VirtualClock {
    /// Clock starting at `start`, displaying times in UTC.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self::with_display_offset(start, Utc.fix())
    }

    pub fn with_display_offset(start: DateTime<Utc>, display_offset: FixedOffset) -> Self {
        Self {
            shared: Arc::new(ClockShared {
                start,
                display_offset,
                state: Mutex::new(ClockState {
                    current: start,
                    timers: Vec::new(),
                    advancing: false,
                }),
            }),
        }
    }

    /// Clock anchored at the current wall-clock time. The wall clock is read
    /// once; afterwards time only moves when advanced.
    pub fn starting_now() -> Self {
        Self::new(Utc::now())
    }

    pub fn from_config(config: &ClockConfig) -> Result<Self, ClockError> {
        Ok(Self::with_display_offset(config.start, config.display_offset()?))
    }

    pub(crate) fn from_shared(shared: Arc<ClockShared>) -> Self {
        Self { shared }
    }

    /// Non-owning handle, for callbacks that need to reach their own clock.
    pub fn downgrade(&self) -> WeakClock {
        WeakClock { shared: Arc::downgrade(&self.shared) }
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.shared.start
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.shared.state.lock().current
    }

    /// Current time in the display offset.
    pub fn local_now(&self) -> DateTime<FixedOffset> {
        self.now().with_timezone(&self.shared.display_offset)
    }

    pub fn display_offset(&self) -> FixedOffset {
        self.shared.display_offset
    }

    /// Time elapsed since the start time.
    pub fn elapsed(&self) -> TimeDelta {
        self.now().signed_duration_since(self.shared.start)
    }

    /// Nanoseconds since the start time, saturating at `i64::MAX`.
    pub fn timestamp(&self) -> i64 {
        self.elapsed().num_nanoseconds().unwrap_or(i64::MAX)
    }

    pub fn timestamp_frequency(&self) -> i64 {
        TIMESTAMP_FREQUENCY
    }

    /// Snapshot of the live timers in creation order.
    ///
    /// Disposed timers may still appear while an advance is in progress.
    pub fn timers(&self) -> Vec<VirtualTimer> {
        self.shared.state.lock().timers.clone()
    }

    /// Create a timer that calls `callback(&state)` each time it fires.
    ///
    /// The timer is registered first and then configured with
    /// `offset`/`period`, so one due right now fires before this returns.
    ///
    /// The clock owns its timers and their callbacks. A callback that owns a
    /// `VirtualClock` clone therefore keeps the clock alive until the timer
    /// is disposed; capture a [`WeakClock`] from [`downgrade`](Self::downgrade)
    /// instead.
    pub fn create_timer<S, F>(
        &self,
        callback: F,
        state: S,
        offset: TimeDelta,
        period: TimeDelta,
    ) -> VirtualTimer
    where
        S: Send + Sync + 'static,
        F: Fn(&S) + Send + Sync + 'static,
    {
        let timer = VirtualTimer::new(&self.shared, Arc::new(move || callback(&state)));
        self.shared.state.lock().timers.push(timer.clone());
        timer.change(offset, period);
        timer
    }

    /// Move time forward by `duration`, firing every timer due on the way.
    ///
    /// A negative duration is a backward move and fails like
    /// [`advance_to`](Self::advance_to) with an earlier target.
    pub fn advance_by(&self, duration: TimeDelta) -> Result<(), ClockError> {
        if duration < TimeDelta::zero() {
            let current = self.now();
            let requested =
                current.checked_add_signed(duration).unwrap_or(DateTime::<Utc>::MIN_UTC);
            return Err(ClockError::BackwardMovement { requested, current });
        }
        if duration.is_zero() {
            return Ok(());
        }
        let target =
            self.now().checked_add_signed(duration).ok_or(ClockError::Overflow(duration))?;
        self.advance_to(target)
    }

    /// Move time forward to `target`, firing every timer due on the way.
    pub fn advance_to(&self, target: DateTime<Utc>) -> Result<(), ClockError> {
        let current = self.now();
        if target < current {
            return Err(ClockError::BackwardMovement { requested: target, current });
        }
        if target == current {
            return Ok(());
        }
        self.run_until(target);
        Ok(())
    }

    /// Absolute setter; same rules as [`advance_to`](Self::advance_to).
    pub fn set_now(&self, instant: DateTime<Utc>) -> Result<(), ClockError> {
        self.advance_to(instant)
    }

    /// Move to `start + elapsed`; same rules as [`advance_to`](Self::advance_to).
    pub fn set_elapsed(&self, elapsed: TimeDelta) -> Result<(), ClockError> {
        let target =
            self.shared.start.checked_add_signed(elapsed).ok_or(ClockError::Overflow(elapsed))?;
        self.advance_to(target)
    }

    fn run_until(&self, target: DateTime<Utc>) {
        let start = self.shared.start;
        tracing::debug!(from = %self.now(), to = %target, "advancing clock");

        loop {
            let (now, timers) = {
                let state = self.shared.state.lock();
                (state.current, state.timers.clone())
            };

            let mut nearest = None;
            let mut batch = Vec::new();
            for timer in &timers {
                let Some(at) = timer.next_fire_time_at(start, now) else {
                    continue;
                };
                if at > target {
                    continue;
                }
                match nearest {
                    Some(n) if at > n => {}
                    Some(n) if at == n => batch.push(timer.clone()),
                    _ => {
                        nearest = Some(at);
                        batch.clear();
                        batch.push(timer.clone());
                    }
                }
            }

            let Some(at) = nearest else {
                break;
            };

            tracing::trace!(%at, timers = batch.len(), "firing batch");
            {
                let _guard = AdvanceGuard::enter(&self.shared, at);
                for timer in &batch {
                    // Disposed by an earlier callback in this batch.
                    if timer.is_disposed() {
                        continue;
                    }
                    timer.fire();
                }
            }
            self.compact();
        }

        let mut state = self.shared.state.lock();
        // A nested advance may already have gone past the target.
        if state.current < target {
            state.current = target;
        }
        tracing::debug!(now = %state.current, "clock advanced");
    }

    /// Drop disposed timers, keeping the survivors in order. Deferred while a
    /// batch is firing.
    pub(crate) fn compact(&self) {
        let mut state = self.shared.state.lock();
        if state.advancing {
            return;
        }
        let before = state.timers.len();
        state.timers.retain(|timer| !timer.is_disposed());
        let removed = before - state.timers.len();
        if removed > 0 {
            tracing::trace!(removed, remaining = state.timers.len(), "compacted timers");
        }
    }
}

/// Weak handle to a [`VirtualClock`], see [`VirtualClock::downgrade`].
#[derive(Clone, Debug, Default)]
pub struct WeakClock {
    shared: Weak<ClockShared>,
}

impl WeakClock {
    /// The clock, if some strong handle still exists.
    pub fn upgrade(&self) -> Option<VirtualClock> {
        self.shared.upgrade().map(VirtualClock::from_shared)
    }
}

/// Moves the clock to a batch instant and holds the advancing flag for the
/// lifetime of the guard, restoring the previous value on drop (including
/// unwinding out of a callback).
struct AdvanceGuard<'a> {
    shared: &'a ClockShared,
    saved: bool,
}

impl<'a> AdvanceGuard<'a> {
    fn enter(shared: &'a ClockShared, at: DateTime<Utc>) -> Self {
        let mut state = shared.state.lock();
        state.current = at;
        let saved = std::mem::replace(&mut state.advancing, true);
        Self { shared, saved }
    }
}

impl Drop for AdvanceGuard<'_> {
    fn drop(&mut self) {
        self.shared.state.lock().advancing = self.saved;
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> DateTime<Utc> {
        VirtualClock::now(self)
    }

    fn timestamp(&self) -> i64 {
        VirtualClock::timestamp(self)
    }
}

impl Default for VirtualClock {
    /// Clock at the Unix epoch, see [`ClockConfig::default`].
    fn default() -> Self {
        Self::new(ClockConfig::default().start)
    }
}

impl fmt::Display for VirtualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.now().format("%Y-%m-%dT%H:%M:%S%.3fZ"))
    }
}

impl fmt::Debug for VirtualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("VirtualClock")
            .field("start", &self.shared.start)
            .field("now", &state.current)
            .field("timers", &state.timers.len())
            .field("advancing", &state.advancing)
            .finish()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
