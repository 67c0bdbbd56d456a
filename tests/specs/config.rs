// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration specs
//!
//! Verify clocks built from TOML settings.

use crate::prelude::*;

const CONFIG_TOML: &str = r#"
start = "2024-06-20T00:00:00Z"
utc_offset_secs = -18000
"#;

#[test]
fn clock_from_toml_config() {
    let config = ClockConfig::from_toml_str(CONFIG_TOML).unwrap();
    let clock = VirtualClock::from_config(&config).unwrap();
    let recorder = Recorder::new();
    clock.create_timer(recorder.callback(), "hourly", TimeDelta::zero(), TimeDelta::hours(1));

    clock.advance_by(TimeDelta::hours(3)).unwrap();

    assert_eq!(recorder.len(), 4);
    assert_eq!(clock.to_string(), "2024-06-20T03:00:00.000Z");
    assert_eq!(clock.local_now().to_rfc3339(), "2024-06-19T22:00:00-05:00");
}

#[yare::parameterized(
    out_of_range_offset = { "utc_offset_secs = 90000" },
    not_toml            = { "start = " },
)]
fn bad_config_is_reported(input: &str) {
    let err = ClockConfig::from_toml_str(input).unwrap_err();
    assert!(matches!(err, ClockError::Config(_)));
    assert!(err.to_string().starts_with("invalid clock config:"));
}
