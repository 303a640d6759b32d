//! Configuration file model for sunshade.
//!
//! Configuration lives in `sunshade.toml`, looked up in
//! `$XDG_CONFIG_HOME/sunshade/` by default. Every field is optional; command
//! line flags override file values via [`Config::merge`].
//!
//! ```toml
//! low_temp = 4000          # Night temperature (1667-25000) Kelvin
//! high_temp = 6500         # Day temperature (1667-25000) Kelvin
//! gamma = 1.0              # Gamma exponent applied to every ramp (> 0)
//!
//! #[Solar schedule]
//! latitude = 59.91         # Degrees, positive north
//! longitude = 10.75        # Degrees, positive east
//!
//! #[Manual schedule] (instead of latitude/longitude)
//! sunrise = "06:30"        # Local time the day temperature is reached
//! sunset = "20:00"         # Local time the night ramp starts
//! duration = 1800          # Ramp length in seconds
//!
//! outputs = ["DP-1"]       # Outputs to manage, by name or description (empty = all)
//! kelvin_steps = [10, 25, 50, 100]
//! ```

pub mod loading;
pub mod validation;

use anyhow::{Result, bail};
use serde::Deserialize;

use crate::common::constants::*;
use crate::core::period::{Schedule, Settings};

pub use loading::{default_config_path, load, load_from_path};
pub use validation::{parse_time_of_day, validate_config};

/// Settings read from `sunshade.toml` or the command line.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Night temperature in Kelvin.
    pub low_temp: Option<u32>,
    /// Day temperature in Kelvin.
    pub high_temp: Option<u32>,
    pub gamma: Option<f64>,

    /// Latitude in degrees, positive north.
    pub latitude: Option<f64>,
    /// Longitude in degrees, positive east.
    pub longitude: Option<f64>,

    /// Manual sunrise as local `HH:MM`.
    pub sunrise: Option<String>,
    /// Manual sunset as local `HH:MM`.
    pub sunset: Option<String>,
    /// Manual ramp duration in seconds.
    pub duration: Option<i64>,

    /// Allow-list of output names or descriptions.
    pub outputs: Option<Vec<String>>,
    pub kelvin_steps: Option<Vec<u32>>,
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Overlay `overrides` on top of this configuration.
    ///
    /// Choosing a schedule on the override side replaces the other schedule
    /// kind from the base, so file coordinates never clash with command line
    /// times (or the reverse).
    pub fn merge(mut self, overrides: Config) -> Config {
        if overrides.has_manual_times() {
            self.latitude = None;
            self.longitude = None;
        }
        if overrides.has_coordinates() {
            self.sunrise = None;
            self.sunset = None;
            self.duration = None;
        }
        Config {
            low_temp: overrides.low_temp.or(self.low_temp),
            high_temp: overrides.high_temp.or(self.high_temp),
            gamma: overrides.gamma.or(self.gamma),
            latitude: overrides.latitude.or(self.latitude),
            longitude: overrides.longitude.or(self.longitude),
            sunrise: overrides.sunrise.or(self.sunrise),
            sunset: overrides.sunset.or(self.sunset),
            duration: overrides.duration.or(self.duration),
            outputs: overrides.outputs.or(self.outputs),
            kelvin_steps: overrides.kelvin_steps.or(self.kelvin_steps),
        }
    }

    pub fn has_manual_times(&self) -> bool {
        self.sunrise.is_some() || self.sunset.is_some()
    }

    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() || self.longitude.is_some()
    }

    pub fn low_temp(&self) -> u32 {
        self.low_temp.unwrap_or(DEFAULT_LOW_TEMP)
    }

    pub fn high_temp(&self) -> u32 {
        self.high_temp.unwrap_or(DEFAULT_HIGH_TEMP)
    }

    pub fn gamma(&self) -> f64 {
        self.gamma.unwrap_or(DEFAULT_GAMMA)
    }

    pub fn duration(&self) -> i64 {
        self.duration.unwrap_or(DEFAULT_MANUAL_DURATION)
    }

    pub fn outputs(&self) -> &[String] {
        self.outputs.as_deref().unwrap_or(&[])
    }

    pub fn kelvin_steps(&self) -> Vec<u32> {
        self.kelvin_steps
            .clone()
            .unwrap_or_else(|| DEFAULT_KELVIN_STEPS.to_vec())
    }

    /// Resolve the schedule kind. `utc_offset` is the local timezone offset
    /// used to anchor manual times.
    pub fn schedule(&self, utc_offset: i64) -> Result<Schedule> {
        match (
            self.latitude,
            self.longitude,
            self.sunrise.as_deref(),
            self.sunset.as_deref(),
        ) {
            (None, None, Some(sunrise), Some(sunset)) => Ok(Schedule::Manual {
                sunrise: parse_time_of_day(sunrise)?,
                sunset: parse_time_of_day(sunset)?,
                duration: self.duration(),
                utc_offset,
            }),
            (Some(latitude), Some(longitude), None, None) => Ok(Schedule::Solar {
                latitude: latitude.to_radians(),
                longitude: longitude.to_radians(),
            }),
            (None, None, None, None) => bail!(
                "no schedule configured: set latitude and longitude, or sunrise and sunset"
            ),
            (_, _, None, None) => bail!("latitude and longitude must be set together"),
            (None, None, _, _) => bail!("sunrise and sunset must be set together"),
            _ => bail!("latitude/longitude cannot be combined with manual sunrise/sunset"),
        }
    }

    /// Build validated scheduler settings.
    pub fn to_settings(&self, utc_offset: i64) -> Result<Settings> {
        validate_config(self)?;
        Settings::new(
            self.high_temp(),
            self.low_temp(),
            self.gamma(),
            self.schedule(utc_offset)?,
            self.kelvin_steps(),
        )
    }

    /// Log the resolved configuration.
    pub fn log_config(&self) {
        log_block_start!("Configuration");
        log_indented!("Temperature range: {}K - {}K", self.low_temp(), self.high_temp());
        log_indented!("Gamma: {}", self.gamma());
        if let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) {
            log_indented!("Location: {:.4}°, {:.4}°", latitude, longitude);
        }
        if let (Some(sunrise), Some(sunset)) = (&self.sunrise, &self.sunset) {
            log_indented!(
                "Manual schedule: sunrise {}, sunset {}, ramp {}s",
                sunrise,
                sunset,
                self.duration()
            );
        }
        if self.outputs().is_empty() {
            log_indented!("Outputs: all");
        } else {
            log_indented!("Outputs: {}", self.outputs().join(", "));
        }
    }
}
