// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Advancing a clock through a series of steps.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use tw_core::{ClockError, VirtualClock};

/// Multi-step advances.
///
/// Each step is a separate `advance_by`/`advance_to` call, so timers observe
/// every intermediate target. The first failing step stops the series; steps
/// before it stay applied.
pub trait AdjustExt {
    /// Advance by each duration in order.
    fn advance_steps<I>(&self, steps: I) -> Result<(), ClockError>
    where
        I: IntoIterator<Item = TimeDelta>;

    /// Visit each instant in ascending order, whatever order they are given in.
    fn advance_through<I>(&self, instants: I) -> Result<(), ClockError>
    where
        I: IntoIterator<Item = DateTime<Utc>>;

    /// Like [`advance_through`](Self::advance_through) for instants in any zone.
    fn advance_through_local<Tz, I>(&self, instants: I) -> Result<(), ClockError>
    where
        Tz: TimeZone,
        I: IntoIterator<Item = DateTime<Tz>>,
    {
        self.advance_through(instants.into_iter().map(|at| at.with_timezone(&Utc)))
    }
}

impl AdjustExt for VirtualClock {
    fn advance_steps<I>(&self, steps: I) -> Result<(), ClockError>
    where
        I: IntoIterator<Item = TimeDelta>,
    {
        for step in steps {
            tracing::trace!(%step, "advance step");
            self.advance_by(step)?;
        }
        Ok(())
    }

    fn advance_through<I>(&self, instants: I) -> Result<(), ClockError>
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        let mut instants: Vec<_> = instants.into_iter().collect();
        instants.sort_unstable();
        for at in instants {
            tracing::trace!(%at, "advance through");
            self.advance_to(at)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "adjust_tests.rs"]
mod tests;
