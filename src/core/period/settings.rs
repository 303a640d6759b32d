//! Immutable scheduler settings, validated once at construction.

use anyhow::{Result, bail, ensure};
use std::f64::consts::{FRAC_PI_2, PI};

use crate::common::constants::{
    MAXIMUM_TEMP, MINIMUM_TEMP, SECONDS_PER_DAY, SECONDS_PER_HALF_DAY,
};
use crate::common::utils::Timestamp;

/// Where the daily events come from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Schedule {
    /// Astronomical events for a location, both angles in radians.
    Solar { latitude: f64, longitude: f64 },
    /// Fixed local times of day (seconds past local midnight) with a ramp
    /// of `duration` seconds before sunrise and after sunset.
    Manual {
        sunrise: i64,
        sunset: i64,
        duration: i64,
        /// Local timezone offset east of UTC, in seconds.
        utc_offset: i64,
    },
}

/// Temperature range, gamma, and schedule driving the phase scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    high_temp: u32,
    low_temp: u32,
    gamma: f64,
    schedule: Schedule,
    kelvin_steps: Vec<u32>,
}

impl Settings {
    /// Validate and build scheduler settings.
    ///
    /// `kelvin_steps` lists the temperature increments used to pace
    /// re-evaluation during ramps, finest first.
    pub fn new(
        high_temp: u32,
        low_temp: u32,
        gamma: f64,
        schedule: Schedule,
        kelvin_steps: Vec<u32>,
    ) -> Result<Self> {
        if high_temp <= low_temp {
            bail!(
                "high temp ({}) must be higher than low temp ({})",
                high_temp,
                low_temp
            );
        }
        for (name, temp) in [("high temp", high_temp), ("low temp", low_temp)] {
            ensure!(
                (MINIMUM_TEMP..=MAXIMUM_TEMP).contains(&temp),
                "{} ({}) must be between {} and {} Kelvin",
                name,
                temp,
                MINIMUM_TEMP,
                MAXIMUM_TEMP
            );
        }
        ensure!(
            gamma.is_finite() && gamma > 0.0,
            "gamma ({}) must be a positive number",
            gamma
        );

        match schedule {
            Schedule::Solar {
                latitude,
                longitude,
            } => {
                ensure!(
                    latitude.is_finite() && (-FRAC_PI_2..=FRAC_PI_2).contains(&latitude),
                    "latitude ({} rad) must be in the interval [-pi/2, pi/2]",
                    latitude
                );
                ensure!(
                    longitude.is_finite() && (-PI..=PI).contains(&longitude),
                    "longitude ({} rad) must be in the interval [-pi, pi]",
                    longitude
                );
            }
            Schedule::Manual {
                sunrise,
                sunset,
                duration,
                utc_offset,
            } => {
                ensure!(duration > 0, "ramp duration ({}s) must be positive", duration);
                for (name, time) in [("sunrise", sunrise), ("sunset", sunset)] {
                    ensure!(
                        (0..SECONDS_PER_DAY).contains(&time),
                        "{} ({}s) must be a time of day",
                        name,
                        time
                    );
                }
                ensure!(
                    sunrise < sunset,
                    "sunrise ({}s) must come before sunset ({}s)",
                    sunrise,
                    sunset
                );
                ensure!(
                    utc_offset.abs() <= SECONDS_PER_DAY / 2 + 3 * 3600,
                    "timezone offset ({}s) is out of range",
                    utc_offset
                );
            }
        }

        ensure!(!kelvin_steps.is_empty(), "at least one kelvin step is required");
        ensure!(
            kelvin_steps.iter().all(|&step| step > 0),
            "kelvin steps must be positive"
        );
        ensure!(
            kelvin_steps.windows(2).all(|pair| pair[0] < pair[1]),
            "kelvin steps must be listed in increasing order"
        );

        Ok(Self {
            high_temp,
            low_temp,
            gamma,
            schedule,
            kelvin_steps,
        })
    }

    pub fn high_temp(&self) -> u32 {
        self.high_temp
    }

    pub fn low_temp(&self) -> u32 {
        self.low_temp
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn kelvin_steps(&self) -> &[u32] {
        &self.kelvin_steps
    }

    /// Seconds past UTC midnight at which this schedule's calendar day begins.
    ///
    /// Solar schedules use local mean solar time derived from longitude;
    /// manual schedules use the configured timezone offset.
    pub fn day_offset(&self) -> i64 {
        match self.schedule {
            Schedule::Solar { longitude, .. } => {
                (-longitude * SECONDS_PER_HALF_DAY as f64 / PI) as i64
            }
            Schedule::Manual { utc_offset, .. } => -utc_offset,
        }
    }

    /// Re-evaluation cadence (seconds) for a ramp window of `window` seconds.
    ///
    /// Uses the finest kelvin step that yields at least one second per step.
    pub fn step_duration(&self, window: Timestamp) -> i64 {
        let span = (self.high_temp - self.low_temp) as i64;
        self.kelvin_steps
            .iter()
            .map(|&step| window * step as i64 / span)
            .find(|&duration| duration >= 1)
            .unwrap_or(1)
    }
}
