// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timers driven by a [`VirtualClock`].
//!
//! A timer is configured with an `offset` measured from the clock's start
//! time and a `period`. A negative offset disables the timer; a period of
//! zero or less makes it one-shot. Timers never fire on their own: the
//! owning clock fires them while it is being advanced.

use crate::clock::{ClockShared, VirtualClock};
use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};

pub(crate) type Callback = Arc<dyn Fn() + Send + Sync>;
type Listener = Arc<dyn Fn(&VirtualTimer) + Send + Sync>;

/// Handle to a timer owned by a [`VirtualClock`].
///
/// Handles are cheap to clone and compare equal when they refer to the same
/// timer.
#[derive(Clone)]
pub struct VirtualTimer {
    inner: Arc<Mutex<TimerState>>,
}

struct TimerState {
    /// `None` once disposed.
    owner: Option<Weak<ClockShared>>,
    callback: Option<Callback>,
    offset: TimeDelta,
    period: TimeDelta,
    listeners: Vec<Listener>,
}

impl VirtualTimer {
    /// Unconfigured timer: disabled until the first [`change`](Self::change).
    pub(crate) fn new(owner: &Arc<ClockShared>, callback: Callback) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TimerState {
                owner: Some(Arc::downgrade(owner)),
                callback: Some(callback),
                offset: TimeDelta::seconds(-1),
                period: TimeDelta::seconds(-1),
                listeners: Vec::new(),
            })),
        }
    }

    /// The owning clock, or `None` once disposed.
    pub fn clock(&self) -> Option<VirtualClock> {
        let shared = self.inner.lock().owner.as_ref()?.upgrade()?;
        Some(VirtualClock::from_shared(shared))
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.lock().owner.is_none()
    }

    /// Configured offset from the clock's start time, `None` once disposed.
    pub fn offset(&self) -> Option<TimeDelta> {
        let state = self.inner.lock();
        state.owner.as_ref().map(|_| state.offset)
    }

    /// Configured period, `None` once disposed.
    pub fn period(&self) -> Option<TimeDelta> {
        let state = self.inner.lock();
        state.owner.as_ref().map(|_| state.period)
    }

    /// Whether the timer can still fire at some point.
    pub fn is_enabled(&self) -> bool {
        match self.clock() {
            Some(clock) => self.is_enabled_at(clock.elapsed()),
            None => false,
        }
    }

    /// Next instant at which the clock will fire this timer.
    pub fn next_fire_time(&self) -> Option<DateTime<Utc>> {
        let clock = self.clock()?;
        self.next_fire_time_at(clock.start_time(), clock.now())
    }

    /// Reconfigure the timer.
    ///
    /// Returns `false` without doing anything if the timer is disposed. When
    /// `start + offset` is exactly the clock's current time the timer fires
    /// before this call returns.
    pub fn change(&self, offset: TimeDelta, period: TimeDelta) -> bool {
        let clock = {
            let mut state = self.inner.lock();
            let Some(shared) = state.owner.as_ref().and_then(Weak::upgrade) else {
                return false;
            };
            state.offset = offset;
            state.period = period;
            VirtualClock::from_shared(shared)
        };

        let due_now = clock.start_time().checked_add_signed(offset) == Some(clock.now());
        if offset >= TimeDelta::zero() && due_now {
            self.fire();
        }
        true
    }

    /// Register a listener invoked with this timer after every callback.
    ///
    /// Listeners run in registration order. Registering on a disposed timer
    /// is ignored.
    pub fn on_fired(&self, listener: impl Fn(&VirtualTimer) + Send + Sync + 'static) {
        let mut state = self.inner.lock();
        if state.owner.is_some() {
            state.listeners.push(Arc::new(listener));
        }
    }

    /// Dispose the timer. Idempotent.
    ///
    /// The clock drops the entry lazily, once no advance is in progress.
    pub fn dispose(&self) {
        let owner = {
            let mut state = self.inner.lock();
            let owner = state.owner.take();
            state.callback = None;
            state.listeners.clear();
            owner
        };

        if let Some(clock) = owner.and_then(|weak| weak.upgrade()).map(VirtualClock::from_shared) {
            tracing::debug!(at = %clock.now(), "timer disposed");
            clock.compact();
        }
    }

    pub fn ptr_eq(&self, other: &VirtualTimer) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Run the callback, then the listeners. No lock is held while user code
    /// runs, so both may call back into the timer or its clock.
    pub(crate) fn fire(&self) {
        let (callback, listeners) = {
            let state = self.inner.lock();
            (state.callback.clone(), state.listeners.clone())
        };

        if let Some(callback) = callback {
            callback();
        }
        for listener in listeners {
            listener(self);
        }
    }

    pub(crate) fn is_enabled_at(&self, elapsed: TimeDelta) -> bool {
        let state = self.inner.lock();
        state.owner.is_some() && is_enabled(state.offset, state.period, elapsed)
    }

    /// Next fire instant given the clock's times, without touching the clock.
    pub(crate) fn next_fire_time_at(
        &self,
        start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let (offset, period) = {
            let state = self.inner.lock();
            state.owner.as_ref()?;
            (state.offset, state.period)
        };
        let due = next_due(offset, period, now.signed_duration_since(start))?;
        start.checked_add_signed(due)
    }
}

impl PartialEq for VirtualTimer {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for VirtualTimer {}

impl fmt::Debug for VirtualTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("VirtualTimer")
            .field("disposed", &state.owner.is_none())
            .field("offset", &state.offset)
            .field("period", &state.period)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

/// Enabled check against the time elapsed since the clock's start.
///
/// Periodic timers stay enabled forever once configured; one-shot timers
/// only until their due point has passed.
fn is_enabled(offset: TimeDelta, period: TimeDelta, elapsed: TimeDelta) -> bool {
    if offset < TimeDelta::zero() {
        return false;
    }
    if period > TimeDelta::zero() {
        return true;
    }
    offset >= elapsed
}

/// Next due point strictly after `elapsed`, both measured from the clock's
/// start time.
///
/// Periodic timers land on `offset + k * period` for `k >= 0`, so a jump over
/// several periods yields the first missed tick, never a later one.
fn next_due(offset: TimeDelta, period: TimeDelta, elapsed: TimeDelta) -> Option<TimeDelta> {
    if !is_enabled(offset, period, elapsed) {
        return None;
    }
    if period <= TimeDelta::zero() {
        return (offset > elapsed).then_some(offset);
    }

    let offset_ns = total_nanos(offset);
    let period_ns = total_nanos(period);
    let elapsed_ns = total_nanos(elapsed);

    let step = (elapsed_ns - offset_ns).div_euclid(period_ns).max(0);
    let mut due = offset_ns + step * period_ns;
    if due <= elapsed_ns {
        due += period_ns;
    }
    from_total_nanos(due)
}

/// Exact nanosecond count; `TimeDelta::num_nanoseconds` gives up past ~292 years.
fn total_nanos(delta: TimeDelta) -> i128 {
    i128::from(delta.num_seconds()) * NANOS_PER_SEC + i128::from(delta.subsec_nanos())
}

fn from_total_nanos(nanos: i128) -> Option<TimeDelta> {
    let secs = i64::try_from(nanos.div_euclid(NANOS_PER_SEC)).ok()?;
    let subsec = u32::try_from(nanos.rem_euclid(NANOS_PER_SEC)).ok()?;
    TimeDelta::new(secs, subsec)
}

const NANOS_PER_SEC: i128 = 1_000_000_000;

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
