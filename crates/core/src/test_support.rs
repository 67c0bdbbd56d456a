// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for clock inputs.
pub mod strategies {
    use chrono::TimeDelta;
    use proptest::prelude::*;

    /// Non-negative advance of up to ten seconds, in whole milliseconds.
    pub fn arb_step() -> impl Strategy<Value = TimeDelta> {
        (0i64..=10_000).prop_map(TimeDelta::milliseconds)
    }

    /// Strictly positive timer period of up to three seconds.
    pub fn arb_period() -> impl Strategy<Value = TimeDelta> {
        (1i64..=3_000).prop_map(TimeDelta::milliseconds)
    }

    /// Timer offset from the clock start, zero included.
    pub fn arb_offset() -> impl Strategy<Value = TimeDelta> {
        (0i64..=5_000).prop_map(TimeDelta::milliseconds)
    }
}

// ── Fixtures ────────────────────────────────────────────────────────────

/// 2000-01-01T00:00:00Z
pub fn millennium() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).single().unwrap_or_default()
}

pub fn secs(n: i64) -> TimeDelta {
    TimeDelta::seconds(n)
}

/// Ordered log of labels recorded by timer callbacks.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback for [`VirtualClock::create_timer`](crate::VirtualClock::create_timer)
    /// that records its label state.
    pub fn callback(&self) -> impl Fn(&&'static str) + Send + Sync + 'static {
        let recorder = self.clone();
        move |label: &&'static str| recorder.record(*label)
    }

    pub fn record(&self, label: impl Into<String>) {
        self.calls.lock().push(label.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    /// All labels joined without a separator, e.g. `"ABCA"`.
    pub fn sequence(&self) -> String {
        self.calls.lock().concat()
    }

    pub fn joined(&self, separator: &str) -> String {
        self.calls.lock().join(separator)
    }
}
