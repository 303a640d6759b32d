//! Phase scheduling for the daily color temperature cycle.
//!
//! The scheduler turns a day's solar events (or fixed manual times) into a
//! phase, answers "what temperature now" and "when to look again", and only
//! re-plans when the schedule's calendar day changes.
//!
//! ## Key Functionality
//! - **Day Planning**: [`state::advance`] maps the previous state and the new
//!   day to the next phase, including midnight-sun/polar-night handling
//! - **Queries**: [`calculations::temperature`] and [`calculations::deadline`]
//! - **Overrides**: forced high/low modes that bypass solar planning
//!
//! Day boundaries follow local mean solar time for solar schedules and the
//! configured timezone for manual ones (see [`Settings::day_offset`]).

pub mod calculations;
pub mod settings;
pub mod state;

pub use settings::{Schedule, Settings};
pub use state::{Anomaly, DayChange, DayInput, ForceMode, Phase, Pinned, SchedulerState};

use crate::common::utils::{Timestamp, day_start, format_clock};
use crate::geo::{SunTimes, calc_sun_for_day};

/// Stateful facade over the day planner.
#[derive(Debug, Clone)]
pub struct Scheduler {
    settings: Settings,
    state: SchedulerState,
    force: ForceMode,
    last_update: Timestamp,
    last_anomaly: Option<Anomaly>,
    solar_calculations: u64,
}

impl Scheduler {
    /// Create a scheduler and plan the day containing `now`.
    pub fn new(settings: Settings, now: Timestamp) -> Self {
        let mut scheduler = Self {
            settings,
            state: SchedulerState::default(),
            force: ForceMode::Off,
            last_update: now,
            last_anomaly: None,
            solar_calculations: 0,
        };
        scheduler.recompute(now);
        scheduler
    }

    /// Re-plan if `now` falls on a different day than the current plan.
    ///
    /// Returns whether a new plan was made.
    pub fn recompute(&mut self, now: Timestamp) -> bool {
        self.last_update = now;
        let day = day_start(now, self.settings.day_offset());
        if self.state.calc_day == Some(day) {
            return false;
        }

        let input = match self.force.pinned() {
            Some(pinned) => DayInput::Forced(pinned),
            None => self.day_input(day),
        };
        let change = state::advance(&self.state, day, input, &self.settings);
        if let Some(anomaly) = change.anomaly {
            log_pipe!();
            log_warning!("Unexpected {anomaly}");
            self.last_anomaly = Some(anomaly);
        }
        self.state = change.state;
        self.log_trajectory();
        true
    }

    fn day_input(&mut self, day: Timestamp) -> DayInput {
        match *self.settings.schedule() {
            Schedule::Manual {
                sunrise,
                sunset,
                duration,
                ..
            } => DayInput::Manual(SunTimes {
                dawn: sunrise - duration,
                sunrise,
                sunset,
                dusk: sunset + duration,
            }),
            Schedule::Solar { latitude, .. } => {
                self.solar_calculations += 1;
                // Shifting back by the offset lands on UTC midnight of the local date
                let midnight = day - self.settings.day_offset();
                DayInput::Solar(calc_sun_for_day(midnight, latitude))
            }
        }
    }

    /// Target temperature at `now` under the current plan.
    pub fn temperature_at(&self, now: Timestamp) -> u32 {
        calculations::temperature(&self.state, &self.settings, now)
    }

    /// Next re-evaluation instant after `now` under the current plan.
    pub fn deadline_after(&self, now: Timestamp) -> Timestamp {
        calculations::deadline(&self.state, &self.settings, now)
    }

    /// Temperature at the time of the last [`recompute`](Self::recompute).
    pub fn current_temperature(&self) -> u32 {
        self.temperature_at(self.last_update)
    }

    /// Deadline following the last [`recompute`](Self::recompute).
    pub fn next_deadline(&self) -> Timestamp {
        self.deadline_after(self.last_update)
    }

    /// Set the operator override. The next recompute re-plans immediately.
    pub fn set_forced(&mut self, mode: ForceMode) {
        if self.force != mode {
            self.force = mode;
            self.state.calc_day = None;
        }
    }

    pub fn forced(&self) -> ForceMode {
        self.force
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn phase(&self) -> &Phase {
        &self.state.phase
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Most recent anomalous polar transition, if one has occurred.
    pub fn last_anomaly(&self) -> Option<Anomaly> {
        self.last_anomaly
    }

    /// Number of solar event calculations performed so far.
    pub fn solar_calculations(&self) -> u64 {
        self.solar_calculations
    }

    fn log_trajectory(&self) {
        match self.state.phase {
            Phase::Initial => {}
            Phase::Normal { sun, .. } => {
                log_block_start!("Calculated sun trajectory");
                log_indented!(
                    "dawn {}, sunrise {}, sunset {}, dusk {}",
                    format_clock(sun.dawn),
                    format_clock(sun.sunrise),
                    format_clock(sun.sunset),
                    format_clock(sun.dusk)
                );
            }
            Phase::Transition { dawn, sunrise, .. } => {
                log_block_start!("Calculated sun trajectory");
                log_indented!(
                    "dawn {}, sunrise {}, midnight sun",
                    format_clock(dawn),
                    format_clock(sunrise)
                );
            }
            Phase::Static { condition } => {
                log_block_start!("Calculated sun trajectory");
                log_indented!("{}", condition.display_name());
            }
            Phase::Forced { pinned } => {
                log_block_start!("Forced mode active");
                log_indented!(
                    "holding {} temperature",
                    match pinned {
                        Pinned::High => "high",
                        Pinned::Low => "low",
                    }
                );
            }
        }
    }
}
