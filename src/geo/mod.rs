//! Geographic sunrise/sunset calculations.
//!
//! - [`solar`]: Astronomical approximation of dawn, sunrise, sunset and dusk for a
//!   day and latitude, including midnight-sun and polar-night detection.
//!
//! Longitude never enters the calculation itself: it only moves the start of
//! the local solar day, which the scheduler owns.

pub mod solar;

pub use solar::{Condition, SolarEvents, SunTimes, calc_sun, calc_sun_for_day};
