//! Property-based tests for the day/night clock.
//!
//! For any sequence of positive frame deltas:
//! - the time of day stays in `[0, day_length)`
//! - the day counter advances once per full day crossed
//! - one long skip lands on the same day and hour as the total implies

use proptest::prelude::*;
use wildlands_world::DayNight;

/// Totals closer than this to a day boundary may round either way in `f32`.
const BOUNDARY_SLACK: f64 = 0.01;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn days_advance_once_per_full_day(
        day_length in 10.0f32..250.0,
        deltas in prop::collection::vec(0.001f32..50.0, 1..200),
    ) {
        let mut clock = DayNight::new(day_length);
        let mut total = 0.0f64;

        for dt in deltas {
            let before = clock.day_number;
            clock.update(dt);
            total += f64::from(dt);

            prop_assert!(clock.elapsed >= 0.0);
            prop_assert!(clock.elapsed < clock.day_length);
            prop_assert!(clock.day_number >= before);

            let days = total / f64::from(day_length);
            let expected = 1 + days.floor() as u32;
            let near_boundary = (days - days.round()).abs() * f64::from(day_length) < BOUNDARY_SLACK;
            if near_boundary {
                prop_assert!(clock.day_number.abs_diff(expected) <= 1);
            } else {
                prop_assert_eq!(clock.day_number, expected);
            }
        }
    }

    #[test]
    fn skipping_lands_on_the_right_day(
        day_length in 10.0f32..250.0,
        days in 0u32..20,
        fraction in 0.05f32..0.95,
    ) {
        let mut jumped = DayNight::new(day_length);
        jumped.skip_time(day_length * (days as f32 + fraction));

        prop_assert_eq!(jumped.day_number, 1 + days);
        prop_assert!((jumped.progress() - fraction).abs() < 1e-3);
    }
}
