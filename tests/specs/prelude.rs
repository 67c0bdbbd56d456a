// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared imports and fixtures for the specs.

pub use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta, TimeZone, Utc};
pub use tw_core::test_support::{millennium, secs, Recorder};
pub use tw_core::{ClockConfig, ClockError, VirtualClock, VirtualTimer};
pub use tw_ext::{clock_at_local, AdjustExt};

/// Route `tracing` output through the test harness. `RUST_LOG=tw_core=trace`
/// shows every fired batch.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Clock with the three periodic timers A (1s), B (2s) and C (3s), all due
/// from the start.
pub fn abc_clock(recorder: &Recorder) -> VirtualClock {
    init_tracing();
    let clock = VirtualClock::new(millennium());
    clock.create_timer(recorder.callback(), "A", TimeDelta::zero(), secs(1));
    clock.create_timer(recorder.callback(), "B", TimeDelta::zero(), secs(2));
    clock.create_timer(recorder.callback(), "C", TimeDelta::zero(), secs(3));
    clock
}

pub const ABC_TO_ELEVEN: &str = "ABCAABACABAABCAABACABA";
