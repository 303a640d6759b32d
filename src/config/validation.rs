//! Configuration validation.
//!
//! Checks ranges and formats at the file level (degrees, `HH:MM` strings).
//! Completeness of the schedule is checked when settings are built, after
//! command line overrides have been merged in.

use anyhow::{Context, Result, bail};
use chrono::{NaiveTime, Timelike};

use super::Config;
use crate::common::constants::*;

/// Parse a local `HH:MM` time into seconds past midnight.
pub fn parse_time_of_day(value: &str) -> Result<i64> {
    let time = NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .with_context(|| format!("invalid time '{value}', expected HH:MM"))?;
    Ok(time.num_seconds_from_midnight() as i64)
}

pub fn validate_config(config: &Config) -> Result<()> {
    for (name, temp) in [("low_temp", config.low_temp), ("high_temp", config.high_temp)] {
        if let Some(temp) = temp
            && !(MINIMUM_TEMP..=MAXIMUM_TEMP).contains(&temp)
        {
            bail!(
                "{} ({}) must be between {} and {} Kelvin",
                name,
                temp,
                MINIMUM_TEMP,
                MAXIMUM_TEMP
            );
        }
    }
    if config.high_temp() <= config.low_temp() {
        bail!(
            "high_temp ({}) must be higher than low_temp ({})",
            config.high_temp(),
            config.low_temp()
        );
    }

    if let Some(gamma) = config.gamma
        && !(gamma.is_finite() && gamma > 0.0)
    {
        bail!("gamma ({}) must be a positive number", gamma);
    }

    if let Some(lat) = config.latitude
        && !(MINIMUM_LATITUDE..=MAXIMUM_LATITUDE).contains(&lat)
    {
        bail!("latitude must be between -90 and 90 degrees (got {})", lat);
    }
    if let Some(lon) = config.longitude
        && !(MINIMUM_LONGITUDE..=MAXIMUM_LONGITUDE).contains(&lon)
    {
        bail!("longitude must be between -180 and 180 degrees (got {})", lon);
    }

    let sunrise = config
        .sunrise
        .as_deref()
        .map(parse_time_of_day)
        .transpose()
        .context("invalid sunrise")?;
    let sunset = config
        .sunset
        .as_deref()
        .map(parse_time_of_day)
        .transpose()
        .context("invalid sunset")?;
    if let (Some(sunrise), Some(sunset)) = (sunrise, sunset)
        && sunrise >= sunset
    {
        bail!(
            "sunrise ({}) must come before sunset ({})",
            config.sunrise.as_deref().unwrap_or_default(),
            config.sunset.as_deref().unwrap_or_default()
        );
    }

    if let Some(duration) = config.duration
        && duration <= 0
    {
        bail!("duration ({}s) must be positive", duration);
    }

    if config.has_manual_times() && config.has_coordinates() {
        bail!("latitude/longitude cannot be combined with manual sunrise/sunset");
    }

    if let Some(steps) = &config.kelvin_steps {
        if steps.is_empty() {
            bail!("kelvin_steps must not be empty");
        }
        if steps.contains(&0) {
            bail!("kelvin_steps must be positive");
        }
        if steps.windows(2).any(|pair| pair[0] >= pair[1]) {
            bail!("kelvin_steps must be listed in increasing order");
        }
    }

    if config.outputs().iter().any(|output| output.trim().is_empty()) {
        bail!("outputs must not contain empty names");
    }

    Ok(())
}
