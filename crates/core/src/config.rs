// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock construction settings.
//!
//! ```toml
//! start = "2024-06-20T00:00:00Z"
//! utc_offset_secs = 7200
//! ```

use crate::error::ClockError;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;

/// Settings for building a [`VirtualClock`](crate::VirtualClock).
///
/// Both fields are optional in TOML. A missing `start` means the Unix epoch,
/// never the wall clock; use [`VirtualClock::starting_now`](crate::VirtualClock::starting_now)
/// when a real-time anchor is wanted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClockConfig {
    /// Start instant of the clock.
    pub start: DateTime<Utc>,
    /// Display offset east of UTC, in seconds. Never affects scheduling.
    pub utc_offset_secs: i32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self { start: DateTime::<Utc>::UNIX_EPOCH, utc_offset_secs: 0 }
    }
}

impl ClockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ClockError> {
        let config: Self = toml::from_str(input).map_err(|e| ClockError::Config(e.to_string()))?;
        config.display_offset()?;
        Ok(config)
    }

    crate::setters! {
        into { start: DateTime<Utc> }
        set { utc_offset_secs: i32 }
    }

    pub fn utc_offset(mut self, v: FixedOffset) -> Self {
        self.utc_offset_secs = v.local_minus_utc();
        self
    }

    /// The display offset, or a config error if it is 24 hours or more.
    pub fn display_offset(&self) -> Result<FixedOffset, ClockError> {
        FixedOffset::east_opt(self.utc_offset_secs).ok_or_else(|| {
            ClockError::Config(format!("utc_offset_secs out of range: {}", self.utc_offset_secs))
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
