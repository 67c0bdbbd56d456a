// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tw-core: deterministic virtual clock with synchronously fired timers

pub mod clock;
pub mod config;
pub mod error;
pub mod macros;
pub mod timer;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, VirtualClock, WeakClock, TIMESTAMP_FREQUENCY};
pub use config::ClockConfig;
pub use error::ClockError;
pub use timer::VirtualTimer;
