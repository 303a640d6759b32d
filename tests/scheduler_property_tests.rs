use proptest::prelude::*;
use sunshade::backend::whitepoint;
use sunshade::common::utils::Timestamp;
use sunshade::core::period::{ForceMode, Phase, Schedule, Scheduler, Settings};
use sunshade::geo::{Condition, calc_sun};
use sunshade::logger::Log;

/// Instants between 2000-01-01 and 2100-01-01
fn timestamp_strategy() -> impl Strategy<Value = Timestamp> {
    946_684_800i64..4_102_444_800i64
}

/// Latitudes where every day has all four events
fn temperate_latitude_strategy() -> impl Strategy<Value = f64> {
    -57.0..57.0
}

fn solar_settings(latitude: f64, longitude: f64) -> Settings {
    Settings::new(
        6500,
        4000,
        1.0,
        Schedule::Solar {
            latitude: latitude.to_radians(),
            longitude: longitude.to_radians(),
        },
        vec![10, 25, 50, 100],
    )
    .unwrap()
}

#[cfg(test)]
mod color_tests {
    use super::*;

    proptest! {
        /// Every supported temperature yields channels in [0, 1] with the brightest at 1.
        #[test]
        fn test_whitepoint_normalized(temp in 1667u32..=25000) {
            let wp = whitepoint(temp).unwrap();
            for channel in [wp.r, wp.g, wp.b] {
                prop_assert!((0.0..=1.0).contains(&channel), "{temp}K: {wp:?}");
            }
            prop_assert!((wp.r.max(wp.g).max(wp.b) - 1.0).abs() < 1e-12);
        }

        #[test]
        fn test_whitepoint_rejects_out_of_range(temp in prop_oneof![0u32..1667, 25001u32..100_000]) {
            prop_assert!(whitepoint(temp).is_err());
        }
    }
}

#[cfg(test)]
mod solar_tests {
    use super::*;

    proptest! {
        /// Outside the polar regions the four events exist and are ordered.
        #[test]
        fn test_events_ordered(
            year in 2000i32..2100,
            day in 0u32..365,
            latitude in temperate_latitude_strategy()
        ) {
            let events = calc_sun(year, day, latitude.to_radians());
            prop_assert_eq!(events.condition, Condition::Normal);
            let times = events.times.unwrap();
            prop_assert!(times.dawn <= times.sunrise);
            prop_assert!(times.sunrise <= times.sunset);
            prop_assert!(times.sunset <= times.dusk);
        }

        /// Any latitude produces either ordered events or a polar condition, never a panic.
        #[test]
        fn test_any_latitude_classified(
            year in 2000i32..2100,
            day in 0u32..365,
            latitude in -89.9f64..89.9
        ) {
            let events = calc_sun(year, day, latitude.to_radians());
            match events.condition {
                Condition::Normal => prop_assert!(events.times.unwrap().is_ordered()),
                _ => prop_assert!(events.times.is_none()),
            }
        }
    }
}

#[cfg(test)]
mod scheduling_tests {
    use super::*;

    proptest! {
        /// Deadlines always lie in the future, for every latitude and instant.
        #[test]
        fn test_deadline_after_now(
            now in timestamp_strategy(),
            latitude in -89.9f64..89.9,
            longitude in -179.9f64..179.9
        ) {
            Log::set_enabled(false);
            let scheduler = Scheduler::new(solar_settings(latitude, longitude), now);
            prop_assert!(scheduler.next_deadline() > now);
            prop_assert!(scheduler.deadline_after(now) > now);
        }

        /// Temperatures stay within the configured range.
        #[test]
        fn test_temperature_within_range(
            now in timestamp_strategy(),
            latitude in -89.9f64..89.9,
            longitude in -179.9f64..179.9
        ) {
            Log::set_enabled(false);
            let scheduler = Scheduler::new(solar_settings(latitude, longitude), now);
            let temp = scheduler.current_temperature();
            prop_assert!((4000..=6500).contains(&temp), "{temp}K");
        }

        /// Event instants map to the ramp endpoints.
        #[test]
        fn test_event_boundaries(
            now in timestamp_strategy(),
            latitude in temperate_latitude_strategy(),
            longitude in -179.9f64..179.9
        ) {
            Log::set_enabled(false);
            let scheduler = Scheduler::new(solar_settings(latitude, longitude), now);
            let Phase::Normal { sun, .. } = *scheduler.phase() else {
                return Err(TestCaseError::fail("expected a normal day"));
            };
            prop_assert_eq!(scheduler.temperature_at(sun.dawn - 1), 4000);
            prop_assert_eq!(scheduler.temperature_at(sun.dawn), 4000);
            prop_assert_eq!(scheduler.temperature_at(sun.sunrise), 6500);
            prop_assert_eq!(scheduler.temperature_at(sun.sunset), 6500);
            prop_assert_eq!(scheduler.temperature_at(sun.dusk), 4000);
        }

        /// Morning ramps never cool down and evening ramps never warm up.
        #[test]
        fn test_ramps_monotonic(
            now in timestamp_strategy(),
            latitude in temperate_latitude_strategy(),
            a in 0.0f64..1.0,
            b in 0.0f64..1.0
        ) {
            Log::set_enabled(false);
            let scheduler = Scheduler::new(solar_settings(latitude, 0.0), now);
            let Phase::Normal { sun, .. } = *scheduler.phase() else {
                return Err(TestCaseError::fail("expected a normal day"));
            };
            let (early, late) = (a.min(b), a.max(b));
            let at = |start: Timestamp, stop: Timestamp, f: f64| {
                start + ((stop - start) as f64 * f) as Timestamp
            };

            let morning_early = scheduler.temperature_at(at(sun.dawn, sun.sunrise, early));
            let morning_late = scheduler.temperature_at(at(sun.dawn, sun.sunrise, late));
            prop_assert!(morning_early <= morning_late);

            let evening_early = scheduler.temperature_at(at(sun.sunset, sun.dusk, early));
            let evening_late = scheduler.temperature_at(at(sun.sunset, sun.dusk, late));
            prop_assert!(evening_early >= evening_late);
        }

        /// Recomputing within the same day changes nothing and calculates nothing.
        #[test]
        fn test_recompute_idempotent(
            now in timestamp_strategy(),
            latitude in -89.9f64..89.9,
            longitude in -179.9f64..179.9
        ) {
            Log::set_enabled(false);
            let mut scheduler = Scheduler::new(solar_settings(latitude, longitude), now);
            let state = scheduler.state().clone();
            let calculations = scheduler.solar_calculations();

            prop_assert!(!scheduler.recompute(now));
            prop_assert_eq!(scheduler.state(), &state);
            prop_assert_eq!(scheduler.solar_calculations(), calculations);
        }

        /// Forcing high pins the temperature and leaves the day's events untouched.
        #[test]
        fn test_forced_high_keeps_events(
            now in timestamp_strategy(),
            latitude in temperate_latitude_strategy()
        ) {
            Log::set_enabled(false);
            let mut scheduler = Scheduler::new(solar_settings(latitude, 0.0), now);
            let planned = *scheduler.phase();

            scheduler.set_forced(ForceMode::High);
            scheduler.recompute(now);
            prop_assert_eq!(scheduler.current_temperature(), 6500);
            prop_assert_eq!(scheduler.solar_calculations(), 1);

            scheduler.set_forced(ForceMode::Off);
            scheduler.recompute(now);
            prop_assert_eq!(*scheduler.phase(), planned);
        }
    }
}
