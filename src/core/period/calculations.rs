//! Temperature and deadline queries over a planned phase.
//!
//! Both functions are pure: the same state, settings and instant always give
//! the same answer. They assume `now` lies within the day the state was
//! planned for.

use crate::common::utils::{Timestamp, interpolate_temperature, tomorrow};
use crate::core::period::settings::Settings;
use crate::core::period::state::{Phase, Pinned, SchedulerState};
use crate::geo::{Condition, SunTimes};

/// Temperature before and during the morning ramp, `None` once past sunrise.
fn morning_temperature(
    now: Timestamp,
    dawn: Timestamp,
    sunrise: Timestamp,
    settings: &Settings,
) -> Option<u32> {
    if now < dawn {
        Some(settings.low_temp())
    } else if now < sunrise {
        Some(interpolate_temperature(
            now,
            dawn,
            sunrise,
            settings.low_temp(),
            settings.high_temp(),
        ))
    } else {
        None
    }
}

fn normal_temperature(now: Timestamp, sun: &SunTimes, settings: &Settings) -> u32 {
    if let Some(temp) = morning_temperature(now, sun.dawn, sun.sunrise, settings) {
        temp
    } else if now < sun.sunset {
        settings.high_temp()
    } else if now < sun.dusk {
        interpolate_temperature(
            now,
            sun.sunset,
            sun.dusk,
            settings.high_temp(),
            settings.low_temp(),
        )
    } else {
        settings.low_temp()
    }
}

/// Target color temperature at `now`.
///
/// # Panics
/// When called on a state that was never planned, or on a static phase
/// whose condition is not polar.
pub fn temperature(state: &SchedulerState, settings: &Settings, now: Timestamp) -> u32 {
    match state.phase {
        Phase::Initial => unreachable!("temperature queried before the first recompute"),
        Phase::Normal { ref sun, .. } => normal_temperature(now, sun, settings),
        Phase::Transition { dawn, sunrise, .. } => {
            morning_temperature(now, dawn, sunrise, settings).unwrap_or(settings.high_temp())
        }
        Phase::Static { condition } => match condition {
            Condition::PolarNight => settings.low_temp(),
            Condition::MidnightSun => settings.high_temp(),
            Condition::Normal => unreachable!("static phase planned for a normal day"),
        },
        Phase::Forced { pinned } => match pinned {
            Pinned::High => settings.high_temp(),
            Pinned::Low => settings.low_temp(),
        },
    }
}

fn next_day(now: Timestamp, settings: &Settings) -> Timestamp {
    tomorrow(now, settings.day_offset())
}

/// Deadline before and during the morning ramp, `None` once past sunrise.
fn morning_deadline(
    now: Timestamp,
    dawn: Timestamp,
    sunrise: Timestamp,
    dawn_step: i64,
) -> Option<Timestamp> {
    if now < dawn {
        Some(dawn)
    } else if now < sunrise {
        Some(now + dawn_step)
    } else {
        None
    }
}

/// Next instant at which the temperature should be re-evaluated. Always after `now`.
///
/// # Panics
/// When called on a state that was never planned.
pub fn deadline(state: &SchedulerState, settings: &Settings, now: Timestamp) -> Timestamp {
    match state.phase {
        Phase::Initial => unreachable!("deadline queried before the first recompute"),
        Phase::Normal {
            ref sun,
            dawn_step,
            dusk_step,
        } => morning_deadline(now, sun.dawn, sun.sunrise, dawn_step).unwrap_or_else(|| {
            if now < sun.sunset {
                sun.sunset
            } else if now < sun.dusk {
                now + dusk_step
            } else {
                next_day(now, settings)
            }
        }),
        Phase::Transition {
            dawn,
            sunrise,
            dawn_step,
        } => morning_deadline(now, dawn, sunrise, dawn_step)
            .unwrap_or_else(|| next_day(now, settings)),
        Phase::Static { .. } | Phase::Forced { .. } => next_day(now, settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::period::settings::Schedule;

    const DAY: Timestamp = 1_700_006_400;

    fn settings() -> Settings {
        Settings::new(
            6500,
            4000,
            1.0,
            Schedule::Solar {
                latitude: 0.0,
                longitude: 0.0,
            },
            vec![10],
        )
        .unwrap()
    }

    fn normal_state() -> SchedulerState {
        SchedulerState {
            phase: Phase::Normal {
                sun: SunTimes {
                    dawn: DAY + 5 * 3600 + 1800,
                    sunrise: DAY + 6 * 3600,
                    sunset: DAY + 18 * 3600,
                    dusk: DAY + 18 * 3600 + 1800,
                },
                dawn_step: 7,
                dusk_step: 7,
            },
            condition: Some(Condition::Normal),
            calc_day: Some(DAY),
            previous_events: None,
        }
    }

    fn with_phase(phase: Phase) -> SchedulerState {
        SchedulerState {
            phase,
            ..normal_state()
        }
    }

    #[test]
    fn test_normal_day_temperatures() {
        let state = normal_state();
        let settings = settings();
        assert_eq!(temperature(&state, &settings, DAY + 3600), 4000);
        assert_eq!(temperature(&state, &settings, DAY + 5 * 3600 + 1800), 4000);
        assert_eq!(temperature(&state, &settings, DAY + 5 * 3600 + 2700), 5250);
        assert_eq!(temperature(&state, &settings, DAY + 6 * 3600), 6500);
        assert_eq!(temperature(&state, &settings, DAY + 12 * 3600), 6500);
        assert_eq!(temperature(&state, &settings, DAY + 18 * 3600), 6500);
        assert_eq!(temperature(&state, &settings, DAY + 18 * 3600 + 900), 5250);
        assert_eq!(temperature(&state, &settings, DAY + 18 * 3600 + 1800), 4000);
        assert_eq!(temperature(&state, &settings, DAY + 23 * 3600), 4000);
    }

    #[test]
    fn test_normal_day_deadlines() {
        let state = normal_state();
        let settings = settings();
        assert_eq!(deadline(&state, &settings, DAY + 3600), DAY + 5 * 3600 + 1800);
        assert_eq!(
            deadline(&state, &settings, DAY + 5 * 3600 + 2000),
            DAY + 5 * 3600 + 2007
        );
        assert_eq!(deadline(&state, &settings, DAY + 6 * 3600), DAY + 18 * 3600);
        assert_eq!(
            deadline(&state, &settings, DAY + 18 * 3600 + 10),
            DAY + 18 * 3600 + 17
        );
        assert_eq!(deadline(&state, &settings, DAY + 20 * 3600), DAY + 86400);
    }

    #[test]
    fn test_transition_day() {
        let state = with_phase(Phase::Transition {
            dawn: DAY + 3600,
            sunrise: DAY + 2 * 3600,
            dawn_step: 5,
        });
        let settings = settings();
        assert_eq!(temperature(&state, &settings, DAY + 1800), 4000);
        assert_eq!(temperature(&state, &settings, DAY + 3600 + 1800), 5250);
        assert_eq!(temperature(&state, &settings, DAY + 23 * 3600), 6500);
        assert_eq!(deadline(&state, &settings, DAY + 1800), DAY + 3600);
        assert_eq!(deadline(&state, &settings, DAY + 3600 + 1800), DAY + 3600 + 1805);
        assert_eq!(deadline(&state, &settings, DAY + 3 * 3600), DAY + 86400);
    }

    #[test]
    fn test_static_and_forced_hold_endpoints() {
        let settings = settings();
        let cases = [
            (Phase::Static { condition: Condition::PolarNight }, 4000),
            (Phase::Static { condition: Condition::MidnightSun }, 6500),
            (Phase::Forced { pinned: Pinned::High }, 6500),
            (Phase::Forced { pinned: Pinned::Low }, 4000),
        ];
        for (phase, expected) in cases {
            let state = with_phase(phase);
            for hour in [0, 6, 12, 18, 23] {
                assert_eq!(temperature(&state, &settings, DAY + hour * 3600), expected);
                assert_eq!(deadline(&state, &settings, DAY + hour * 3600), DAY + 86400);
            }
        }
    }

    #[test]
    #[should_panic(expected = "before the first recompute")]
    fn test_initial_state_panics() {
        temperature(&SchedulerState::default(), &settings(), DAY);
    }

    #[test]
    #[should_panic(expected = "static phase planned for a normal day")]
    fn test_static_normal_day_panics() {
        let state = with_phase(Phase::Static {
            condition: Condition::Normal,
        });
        temperature(&state, &settings(), DAY + 12 * 3600);
    }
}
