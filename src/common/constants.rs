//! Application constants and default values for sunshade.
//!
//! This module contains the configuration defaults, validation limits,
//! and astronomical/colorimetric constants used throughout the application.

// ═══ Application Configuration Defaults ═══
// These values are used when config options are not specified by the user

pub const DEFAULT_HIGH_TEMP: u32 = 6500; // Kelvin - reference white, no distortion
pub const DEFAULT_LOW_TEMP: u32 = 4000; // Kelvin - warm night setting
pub const DEFAULT_GAMMA: f64 = 1.0;
pub const DEFAULT_MANUAL_DURATION: i64 = 1800; // seconds - manual dawn/dusk ramp length
pub const DEFAULT_KELVIN_STEPS: &[u32] = &[10, 25, 50, 100]; // finest first
pub const CONFIG_FILE_NAME: &str = "sunshade.toml";
pub const CONFIG_DIR_NAME: &str = "sunshade";
pub const PREVIEW_OUTPUT_NAME: &str = "preview"; // stand-in display for --simulate
pub const PREVIEW_RAMP_SIZE: usize = 256;

// ═══ Validation Limits ═══

// Temperature limits (range covered by the chromaticity approximations)
pub const MINIMUM_TEMP: u32 = 1667;
pub const MAXIMUM_TEMP: u32 = 25000;

// Geographic limits in degrees (file level); radians are checked by Settings
pub const MINIMUM_LATITUDE: f64 = -90.0;
pub const MAXIMUM_LATITUDE: f64 = 90.0;
pub const MINIMUM_LONGITUDE: f64 = -180.0;
pub const MAXIMUM_LONGITUDE: f64 = 180.0;

// ═══ Time Constants ═══

pub const SECONDS_PER_DAY: i64 = 86400;
pub const SECONDS_PER_HALF_DAY: i64 = 43200;

// ═══ Solar Constants ═══
// Zenith angles (radians are derived at use) marking the two thresholds.
// 90.833° is the apparent horizon including refraction and the solar disc.

pub const SOLAR_HORIZON_DEGREES: f64 = 90.833;
pub const TWILIGHT_ZENITH_DEGREES: f64 = SOLAR_HORIZON_DEGREES + 6.0; // dawn / dusk
pub const DAYLIGHT_ZENITH_DEGREES: f64 = SOLAR_HORIZON_DEGREES - 3.0; // sunrise / sunset

// ═══ Color Constants ═══

pub const NEUTRAL_TEMP: u32 = 6500; // D65 reference white
pub const PLANCKIAN_SPLIT_TEMP: u32 = 2222; // y-polynomial change on the Planckian locus
pub const PLANCKIAN_X_SPLIT_TEMP: u32 = 4000; // x-polynomial change on the Planckian locus
pub const ILLUMINANT_D_SPLIT_TEMP: u32 = 7000; // x-polynomial change on the daylight locus
pub const SRGB_LINEAR_THRESHOLD: f64 = 0.0031308;
pub const SRGB_ENCODING_GAMMA: f64 = 2.2;
pub const MAX_CHANNEL_VALUE: f64 = u16::MAX as f64;

// ═══ Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1;
