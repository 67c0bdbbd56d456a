// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tw-ext: convenience layers over the tw-core virtual clock

pub mod adjust;
pub mod local;

pub use adjust::AdjustExt;
pub use local::clock_at_local;
