//! Scheduler state and the day-transition reducer.
//!
//! The scheduler only re-plans when the schedule's calendar day changes (or
//! when a forced mode invalidates the cached day). Re-planning is a pure
//! function of the previous state, the new day start and the day's input, so
//! polar transitions can be exercised without a clock.

use std::fmt;

use crate::common::utils::Timestamp;
use crate::core::period::settings::Settings;
use crate::geo::{Condition, SolarEvents, SunTimes};

/// Operator override cycled by the force toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForceMode {
    #[default]
    Off,
    High,
    Low,
}

impl ForceMode {
    /// Next mode in the toggle cycle `Off -> High -> Low -> Off`.
    pub fn next(self) -> Self {
        match self {
            Self::Off => Self::High,
            Self::High => Self::Low,
            Self::Low => Self::Off,
        }
    }

    /// The endpoint pinned by this mode, if any.
    pub fn pinned(self) -> Option<Pinned> {
        match self {
            Self::Off => None,
            Self::High => Some(Pinned::High),
            Self::Low => Some(Pinned::Low),
        }
    }
}

impl fmt::Display for ForceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::High => write!(f, "high"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Temperature endpoint held by a forced phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pinned {
    High,
    Low,
}

/// Scheduling phase. Only the data a phase needs is carried by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing computed yet. Never observable through [`super::Scheduler`].
    Initial,
    /// Regular day with all four events.
    Normal {
        sun: SunTimes,
        dawn_step: i64,
        dusk_step: i64,
    },
    /// First midnight-sun day after a normal day: the morning ramp is
    /// borrowed from the previous day, then high holds.
    Transition {
        dawn: Timestamp,
        sunrise: Timestamp,
        dawn_step: i64,
    },
    /// Polar day without usable events.
    Static { condition: Condition },
    /// Operator override.
    Forced { pinned: Pinned },
}

impl Phase {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Normal { .. } => "normal",
            Self::Transition { .. } => "transition",
            Self::Static { .. } => "static",
            Self::Forced { .. } => "forced",
        }
    }
}

/// Polar transition that skipped the expected intermediate days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anomaly {
    PolarNightToMidnightSun,
    MidnightSunToPolarNight,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PolarNightToMidnightSun => {
                write!(f, "direct transition from polar night to midnight sun")
            }
            Self::MidnightSunToPolarNight => {
                write!(f, "direct transition from midnight sun to polar night")
            }
        }
    }
}

/// Everything the scheduler remembers between recomputations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerState {
    pub phase: Phase,
    /// Solar condition of the last solar or manual day.
    pub condition: Option<Condition>,
    /// Start of the day the phase was computed for. `None` forces a recompute.
    pub calc_day: Option<Timestamp>,
    /// Last normal day's events relative to that day's start.
    pub previous_events: Option<SunTimes>,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            phase: Phase::Initial,
            condition: None,
            calc_day: None,
            previous_events: None,
        }
    }
}

/// What the new day looks like before it is turned into a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayInput {
    Forced(Pinned),
    /// Manual times relative to the day start.
    Manual(SunTimes),
    Solar(SolarEvents),
}

/// Result of a day transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayChange {
    pub state: SchedulerState,
    pub anomaly: Option<Anomaly>,
}

fn normal_phase(sun: SunTimes, settings: &Settings) -> Phase {
    Phase::Normal {
        sun,
        dawn_step: settings.step_duration(sun.sunrise - sun.dawn),
        dusk_step: settings.step_duration(sun.dusk - sun.sunset),
    }
}

/// Plan the day starting at `day` given the previous state.
pub fn advance(
    previous: &SchedulerState,
    day: Timestamp,
    input: DayInput,
    settings: &Settings,
) -> DayChange {
    let mut state = previous.clone();
    state.calc_day = Some(day);

    let anomaly = match input {
        DayInput::Forced(pinned) => {
            state.phase = Phase::Forced { pinned };
            None
        }
        DayInput::Manual(offsets) => {
            state.phase = normal_phase(offsets.shifted(day), settings);
            state.condition = Some(Condition::Normal);
            state.previous_events = Some(offsets);
            None
        }
        DayInput::Solar(events) => match events.condition {
            Condition::Normal => {
                let Some(offsets) = events.times else {
                    unreachable!("normal solar day without event times");
                };
                let mut sun = offsets.shifted(day);
                if previous.condition == Some(Condition::MidnightSun) {
                    // Coming out of midnight sun, the morning is already bright
                    sun.dawn = day;
                    sun.sunrise = day;
                }
                state.phase = normal_phase(sun, settings);
                state.condition = Some(Condition::Normal);
                state.previous_events = Some(sun.shifted(-day));
                None
            }
            Condition::MidnightSun => {
                let anomaly = (previous.condition == Some(Condition::PolarNight))
                    .then_some(Anomaly::PolarNightToMidnightSun);
                state.phase = match (previous.phase, previous.previous_events) {
                    (Phase::Normal { dawn_step, .. }, Some(events)) => Phase::Transition {
                        dawn: day + events.dawn,
                        sunrise: day + events.sunrise,
                        dawn_step,
                    },
                    _ => Phase::Static {
                        condition: Condition::MidnightSun,
                    },
                };
                state.condition = Some(Condition::MidnightSun);
                state.previous_events = None;
                anomaly
            }
            Condition::PolarNight => {
                let anomaly = (previous.condition == Some(Condition::MidnightSun))
                    .then_some(Anomaly::MidnightSunToPolarNight);
                state.phase = Phase::Static {
                    condition: Condition::PolarNight,
                };
                state.condition = Some(Condition::PolarNight);
                state.previous_events = None;
                anomaly
            }
        },
    };

    DayChange { state, anomaly }
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
                latitude: 1.2,
                longitude: 0.0,
            },
            vec![10],
        )
        .unwrap()
    }

    fn offsets() -> SunTimes {
        SunTimes {
            dawn: 5 * 3600,
            sunrise: 6 * 3600,
            sunset: 18 * 3600,
            dusk: 19 * 3600,
        }
    }

    fn normal_day() -> DayInput {
        DayInput::Solar(SolarEvents {
            condition: Condition::Normal,
            times: Some(offsets()),
        })
    }

    fn polar(condition: Condition) -> DayInput {
        DayInput::Solar(SolarEvents {
            condition,
            times: None,
        })
    }

    fn run(days: &[DayInput]) -> Vec<DayChange> {
        let settings = settings();
        let mut state = SchedulerState::default();
        let mut changes = Vec::new();
        for (i, input) in days.iter().enumerate() {
            let change = advance(&state, DAY + i as i64 * 86400, *input, &settings);
            state = change.state.clone();
            changes.push(change);
        }
        changes
    }

    #[test]
    fn test_force_cycle() {
        assert_eq!(ForceMode::Off.next(), ForceMode::High);
        assert_eq!(ForceMode::High.next(), ForceMode::Low);
        assert_eq!(ForceMode::Low.next(), ForceMode::Off);
        assert_eq!(ForceMode::Off.pinned(), None);
        assert_eq!(ForceMode::Low.pinned(), Some(Pinned::Low));
    }

    #[test]
    fn test_normal_day_anchored_to_day_start() {
        let changes = run(&[normal_day()]);
        let Phase::Normal {
            sun,
            dawn_step,
            dusk_step,
        } = changes[0].state.phase
        else {
            panic!("expected normal phase");
        };
        assert_eq!(sun, offsets().shifted(DAY));
        // 3600s over 2500K in 10K steps
        assert_eq!(dawn_step, 14);
        assert_eq!(dusk_step, 14);
        assert_eq!(changes[0].state.calc_day, Some(DAY));
        assert_eq!(changes[0].anomaly, None);
    }

    #[test]
    fn test_normal_then_midnight_sun_is_transition() {
        let changes = run(&[normal_day(), polar(Condition::MidnightSun)]);
        let tomorrow = DAY + 86400;
        assert_eq!(
            changes[1].state.phase,
            Phase::Transition {
                dawn: tomorrow + 5 * 3600,
                sunrise: tomorrow + 6 * 3600,
                dawn_step: 14,
            }
        );
        assert_eq!(changes[1].state.condition, Some(Condition::MidnightSun));
        assert_eq!(changes[1].anomaly, None);
    }

    #[test]
    fn test_second_midnight_sun_day_is_static() {
        let changes = run(&[
            normal_day(),
            polar(Condition::MidnightSun),
            polar(Condition::MidnightSun),
        ]);
        assert_eq!(
            changes[2].state.phase,
            Phase::Static {
                condition: Condition::MidnightSun
            }
        );
    }

    #[test]
    fn test_first_day_midnight_sun_is_static() {
        let changes = run(&[polar(Condition::MidnightSun)]);
        assert_eq!(
            changes[0].state.phase,
            Phase::Static {
                condition: Condition::MidnightSun
            }
        );
    }

    #[test]
    fn test_normal_after_midnight_sun_collapses_morning() {
        let changes = run(&[polar(Condition::MidnightSun), normal_day()]);
        let tomorrow = DAY + 86400;
        let Phase::Normal { sun, dawn_step, .. } = changes[1].state.phase else {
            panic!("expected normal phase");
        };
        assert_eq!(sun.dawn, tomorrow);
        assert_eq!(sun.sunrise, tomorrow);
        assert_eq!(sun.sunset, tomorrow + 18 * 3600);
        assert_eq!(dawn_step, 1);
    }

    #[test]
    fn test_polar_night_is_static() {
        let changes = run(&[normal_day(), polar(Condition::PolarNight)]);
        assert_eq!(
            changes[1].state.phase,
            Phase::Static {
                condition: Condition::PolarNight
            }
        );
        assert_eq!(changes[1].anomaly, None);
    }

    #[test]
    fn test_direct_polar_flips_report_anomalies() {
        let changes = run(&[
            polar(Condition::PolarNight),
            polar(Condition::MidnightSun),
            polar(Condition::PolarNight),
        ]);
        assert_eq!(changes[0].anomaly, None);
        assert_eq!(changes[1].anomaly, Some(Anomaly::PolarNightToMidnightSun));
        assert_eq!(
            changes[1].state.phase,
            Phase::Static {
                condition: Condition::MidnightSun
            }
        );
        assert_eq!(changes[2].anomaly, Some(Anomaly::MidnightSunToPolarNight));
    }

    #[test]
    fn test_forced_keeps_solar_memory() {
        let changes = run(&[normal_day(), DayInput::Forced(Pinned::Low)]);
        let forced = &changes[1].state;
        assert_eq!(forced.phase, Phase::Forced { pinned: Pinned::Low });
        assert_eq!(forced.condition, Some(Condition::Normal));
        assert_eq!(forced.previous_events, Some(offsets()));
    }

    #[test]
    fn test_manual_day() {
        let settings = settings();
        let change = advance(
            &SchedulerState::default(),
            DAY,
            DayInput::Manual(offsets()),
            &settings,
        );
        assert!(matches!(change.state.phase, Phase::Normal { sun, .. } if sun.sunset == DAY + 18 * 3600));
        assert_eq!(change.state.condition, Some(Condition::Normal));
    }
}
