// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by clock operations.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use thiserror::Error;

/// Misuse of the virtual clock.
///
/// Every variant is reported before any clock state is touched, so a failed
/// call leaves the clock and its timers exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("time can't be moved backward: requested {requested}, current time is {current}")]
    BackwardMovement { requested: DateTime<Utc>, current: DateTime<Utc> },

    #[error("moving by {0} leaves the representable time range")]
    Overflow(TimeDelta),

    #[error("local time {local} is {reason} in the requested time zone")]
    InvalidLocalTime { local: NaiveDateTime, reason: &'static str },

    #[error("invalid clock config: {0}")]
    Config(String),
}
