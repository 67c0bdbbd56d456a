// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Advance properties
//!
//! Splitting an advance into steps never changes what fires or where time
//! ends up, and failed advances change nothing.

use proptest::prelude::*;
use tw_core::test_support::strategies::{arb_offset, arb_period, arb_step};

use crate::prelude::*;

/// Clock with one periodic and one one-shot timer per (offset, period) pair.
fn seeded(plan: &[(TimeDelta, TimeDelta)], recorder: &Recorder) -> VirtualClock {
    const LABELS: [&str; 8] = ["p0", "o0", "p1", "o1", "p2", "o2", "p3", "o3"];
    let clock = VirtualClock::new(millennium());
    for (i, (offset, period)) in plan.iter().enumerate() {
        clock.create_timer(recorder.callback(), LABELS[2 * i], *offset, *period);
        clock.create_timer(recorder.callback(), LABELS[2 * i + 1], *offset, TimeDelta::zero());
    }
    clock
}

proptest! {
    #[test]
    fn step_series_matches_single_jump(
        plan in proptest::collection::vec((arb_offset(), arb_period()), 1..4),
        steps in proptest::collection::vec(arb_step(), 0..6),
    ) {
        let stepped_calls = Recorder::new();
        let jumped_calls = Recorder::new();
        let stepped = seeded(&plan, &stepped_calls);
        let jumped = seeded(&plan, &jumped_calls);
        let total = steps.iter().fold(TimeDelta::zero(), |acc, step| acc + *step);

        stepped.advance_steps(steps).unwrap();
        jumped.advance_to(millennium() + total).unwrap();

        prop_assert_eq!(stepped.now(), jumped.now());
        prop_assert_eq!(stepped_calls.calls(), jumped_calls.calls());
    }

    #[test]
    fn backward_moves_change_nothing(
        plan in proptest::collection::vec((arb_offset(), arb_period()), 1..4),
        forward in arb_step(),
        back in 1i64..10_000,
    ) {
        let recorder = Recorder::new();
        let clock = seeded(&plan, &recorder);
        clock.advance_by(forward).unwrap();
        let before_now = clock.now();
        let before_calls = recorder.calls();
        let before_timers = clock.timers().len();

        let by = clock.advance_by(TimeDelta::milliseconds(-back));
        let to = clock.advance_to(before_now - TimeDelta::milliseconds(back));

        prop_assert_eq!(
            by,
            Err(ClockError::BackwardMovement {
                requested: before_now - TimeDelta::milliseconds(back),
                current: before_now,
            })
        );
        prop_assert!(matches!(to, Err(ClockError::BackwardMovement { .. })), "unexpected: {:?}", to);
        prop_assert_eq!(clock.now(), before_now);
        prop_assert_eq!(recorder.calls(), before_calls);
        prop_assert_eq!(clock.timers().len(), before_timers);
    }

    #[test]
    fn zero_advances_fire_nothing(
        plan in proptest::collection::vec((arb_offset(), arb_period()), 1..4),
        forward in arb_step(),
    ) {
        let recorder = Recorder::new();
        let clock = seeded(&plan, &recorder);
        clock.advance_by(forward).unwrap();
        let fired = recorder.len();

        clock.advance_by(TimeDelta::zero()).unwrap();
        clock.advance_to(clock.now()).unwrap();

        prop_assert_eq!(recorder.len(), fired);
        prop_assert_eq!(clock.now(), millennium() + forward);
    }
}
