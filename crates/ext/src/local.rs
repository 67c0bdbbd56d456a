// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Building a clock from a wall-clock reading in some time zone.

use chrono::{LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use tw_core::{ClockError, VirtualClock};

/// Clock starting at `local` as read in `zone`.
///
/// The clock's display offset is the zone's offset at that instant. Local
/// times skipped or repeated by a zone transition are rejected rather than
/// guessed.
pub fn clock_at_local<Tz: TimeZone>(
    local: NaiveDateTime,
    zone: &Tz,
) -> Result<VirtualClock, ClockError> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(at) => {
            let offset = at.offset().fix();
            Ok(VirtualClock::with_display_offset(at.with_timezone(&Utc), offset))
        }
        LocalResult::Ambiguous(..) => {
            Err(ClockError::InvalidLocalTime { local, reason: "ambiguous" })
        }
        LocalResult::None => Err(ClockError::InvalidLocalTime { local, reason: "skipped" }),
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
