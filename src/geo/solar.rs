//! Solar event calculation from calendar day and latitude.
//!
//! Uses the NOAA general solar position approximations
//! (https://gml.noaa.gov/grad/solcalc/solareqns.PDF): a fractional orbit
//! angle for the day, then closed-form Fourier series for the equation of
//! time and the solar declination. The hour angle at which the sun crosses a
//! given zenith angle locates the four daily events.
//!
//! All event times are returned as seconds past the local mean-solar
//! midnight of the requested day; the scheduler anchors them to absolute
//! timestamps. Longitude only shifts that anchor, so it does not appear here.

use std::f64::consts::PI;

use crate::common::constants::{DAYLIGHT_ZENITH_DEGREES, TWILIGHT_ZENITH_DEGREES};
use crate::common::utils::{Timestamp, year_and_ordinal};

/// How the sun behaves over a day at a given latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// The sun rises and sets; all four events exist.
    Normal,
    /// The sun never drops far enough to produce dawn/dusk or sunrise/sunset.
    MidnightSun,
    /// The sun never climbs far enough to produce them.
    PolarNight,
}

impl Condition {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::MidnightSun => "midnight sun",
            Self::PolarNight => "polar night",
        }
    }
}

/// The four daily events, `dawn <= sunrise <= sunset <= dusk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTimes {
    pub dawn: Timestamp,
    pub sunrise: Timestamp,
    pub sunset: Timestamp,
    pub dusk: Timestamp,
}

impl SunTimes {
    /// Move every event by `offset` seconds.
    pub fn shifted(&self, offset: i64) -> Self {
        Self {
            dawn: self.dawn + offset,
            sunrise: self.sunrise + offset,
            sunset: self.sunset + offset,
            dusk: self.dusk + offset,
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.dawn <= self.sunrise && self.sunrise <= self.sunset && self.sunset <= self.dusk
    }
}

/// Result of a solar calculation for one day.
///
/// `times` is only present for [`Condition::Normal`]; on polar days the hour
/// angles are undefined and no event time is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolarEvents {
    pub condition: Condition,
    pub times: Option<SunTimes>,
}

pub fn days_in_year(year: i32) -> u32 {
    let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
    if leap { 366 } else { 365 }
}

/// Fractional year (radians) for a zero-based day of year.
pub fn orbit_angle(year: i32, day_of_year: u32) -> f64 {
    2.0 * PI / days_in_year(year) as f64 * day_of_year as f64
}

/// Equation of time in "quarter radians": `to_degrees()` of this value is minutes.
pub fn equation_of_time(orbit_angle: f64) -> f64 {
    4.0 * (0.000075 + 0.001868 * orbit_angle.cos()
        - 0.032077 * orbit_angle.sin()
        - 0.014615 * (2.0 * orbit_angle).cos()
        - 0.040849 * (2.0 * orbit_angle).sin())
}

/// Solar declination in radians.
pub fn sun_declination(orbit_angle: f64) -> f64 {
    0.006918 - 0.399912 * orbit_angle.cos() + 0.070257 * orbit_angle.sin()
        - 0.006758 * (2.0 * orbit_angle).cos()
        + 0.000907 * (2.0 * orbit_angle).sin()
        - 0.002697 * (3.0 * orbit_angle).cos()
        + 0.00148 * (3.0 * orbit_angle).sin()
}

/// Hour angle at which the sun sits at `zenith`, or `None` when it never does.
fn sun_hour_angle(latitude: f64, declination: f64, zenith: f64) -> Option<f64> {
    let cos_hour_angle =
        zenith.cos() / (latitude.cos() * declination.cos()) - latitude.tan() * declination.tan();
    if (-1.0..=1.0).contains(&cos_hour_angle) {
        Some(cos_hour_angle.acos())
    } else {
        None
    }
}

/// Seconds past local solar midnight for a signed hour angle.
///
/// Positive hour angles are morning events, negative ones evening events.
fn hour_angle_to_time(hour_angle: f64, eqtime: f64) -> Timestamp {
    ((4.0 * PI - 4.0 * hour_angle - eqtime) * 60.0).to_degrees() as Timestamp
}

fn polar_condition(latitude: f64, declination: f64) -> Condition {
    if latitude.is_sign_negative() == declination.is_sign_negative() {
        Condition::MidnightSun
    } else {
        Condition::PolarNight
    }
}

/// Compute the solar events of a day.
///
/// # Arguments
/// * `year` - Calendar year, used for leap-year handling
/// * `day_of_year` - Zero-based day of the year
/// * `latitude` - Latitude in radians, positive north
pub fn calc_sun(year: i32, day_of_year: u32, latitude: f64) -> SolarEvents {
    let angle = orbit_angle(year, day_of_year);
    let declination = sun_declination(angle);
    let eqtime = equation_of_time(angle);

    let twilight = sun_hour_angle(latitude, declination, TWILIGHT_ZENITH_DEGREES.to_radians());
    let daylight = sun_hour_angle(latitude, declination, DAYLIGHT_ZENITH_DEGREES.to_radians());

    match (twilight, daylight) {
        (Some(twilight), Some(daylight)) => SolarEvents {
            condition: Condition::Normal,
            times: Some(SunTimes {
                dawn: hour_angle_to_time(twilight.abs(), eqtime),
                sunrise: hour_angle_to_time(daylight.abs(), eqtime),
                sunset: hour_angle_to_time(-daylight.abs(), eqtime),
                dusk: hour_angle_to_time(-twilight.abs(), eqtime),
            }),
        },
        _ => SolarEvents {
            condition: polar_condition(latitude, declination),
            times: None,
        },
    }
}

/// Compute the solar events for the UTC calendar date starting at `midnight`.
pub fn calc_sun_for_day(midnight: Timestamp, latitude: f64) -> SolarEvents {
    let (year, day_of_year) = year_and_ordinal(midnight);
    calc_sun(year, day_of_year, latitude)
}
