//! Color temperature to gamma ramp conversion.
//!
//! A temperature is first located on one of two chromaticity curves: the
//! Planckian (black body) locus for warm light below the reference white, and
//! the CIE Illuminant D (daylight) locus from the reference white upwards.
//! The resulting CIE xyY chromaticity is converted to linear sRGB, gamma
//! encoded and normalized so the brightest channel is exactly 1.0. That
//! whitepoint then scales each channel of the per-output ramp table.
//!
//! Everything here is pure: no state, no I/O. Ramp storage is owned by the
//! caller (usually the display session) and only filled in here.

use anyhow::{Result, bail};

use crate::common::constants::{
    ILLUMINANT_D_SPLIT_TEMP, MAX_CHANNEL_VALUE, MAXIMUM_TEMP, MINIMUM_TEMP, NEUTRAL_TEMP,
    PLANCKIAN_SPLIT_TEMP, PLANCKIAN_X_SPLIT_TEMP, SRGB_ENCODING_GAMMA, SRGB_LINEAR_THRESHOLD,
};

/// Normalized RGB channel multipliers for a color temperature.
///
/// Every channel lies in `[0, 1]` and at least one channel equals `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Whitepoint {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Whitepoint {
    /// The reference white: no channel is attenuated.
    pub const NEUTRAL: Whitepoint = Whitepoint {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    fn channels(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}

/// CIE 1931 chromaticity with the derived `z = 1 - x - y`.
#[derive(Debug, Clone, Copy)]
struct Chromaticity {
    x: f64,
    y: f64,
}

impl Chromaticity {
    fn z(&self) -> f64 {
        1.0 - self.x - self.y
    }
}

/// Daylight locus approximation, valid from 4000K to 25000K.
fn illuminant_d(temp: f64) -> Chromaticity {
    // https://en.wikipedia.org/wiki/Standard_illuminant#Illuminant_series_D
    let x = if temp <= ILLUMINANT_D_SPLIT_TEMP as f64 {
        0.244063 + 0.09911e3 / temp + 2.9678e6 / temp.powi(2) - 4.6070e9 / temp.powi(3)
    } else {
        0.237040 + 0.24748e3 / temp + 1.9018e6 / temp.powi(2) - 2.0064e9 / temp.powi(3)
    };
    let y = -3.0 * x.powi(2) + 2.870 * x - 0.275;
    Chromaticity { x, y }
}

/// Black body locus approximation (Kim et al.), valid from 1667K to 25000K.
fn planckian_locus(temp: f64) -> Chromaticity {
    // https://en.wikipedia.org/wiki/Planckian_locus#Approximation
    if temp <= PLANCKIAN_X_SPLIT_TEMP as f64 {
        let x = -0.2661239e9 / temp.powi(3) - 0.2343589e6 / temp.powi(2)
            + 0.8776956e3 / temp
            + 0.179910;
        let y = if temp <= PLANCKIAN_SPLIT_TEMP as f64 {
            -1.1063814 * x.powi(3) - 1.34811020 * x.powi(2) + 2.18555832 * x - 0.20219683
        } else {
            -0.9549476 * x.powi(3) - 1.37418593 * x.powi(2) + 2.09137015 * x - 0.16748867
        };
        Chromaticity { x, y }
    } else {
        let x = -3.0258469e9 / temp.powi(3)
            + 2.1070379e6 / temp.powi(2)
            + 0.2226347e3 / temp
            + 0.240390;
        let y = 3.0817580 * x.powi(3) - 5.87338670 * x.powi(2) + 3.75112997 * x - 0.37001483;
        Chromaticity { x, y }
    }
}

/// Inverse sRGB transfer function for a linear value in `[0, 1]`.
fn srgb_encode(value: f64) -> f64 {
    // https://en.wikipedia.org/wiki/SRGB
    if value <= SRGB_LINEAR_THRESHOLD {
        12.92 * value
    } else {
        1.055 * value.powf(1.0 / SRGB_ENCODING_GAMMA) - 0.055
    }
}

fn xyz_to_srgb(c: Chromaticity) -> [f64; 3] {
    // http://www.brucelindbloom.com/index.html?Eqn_RGB_XYZ_Matrix.html
    let (x, y, z) = (c.x, c.y, c.z());
    [
        3.2404542 * x - 1.5371385 * y - 0.4985314 * z,
        -0.9692660 * x + 1.8760108 * y + 0.0415560 * z,
        0.0556434 * x - 0.2040259 * y + 1.0572252 * z,
    ]
    .map(|linear| srgb_encode(linear.clamp(0.0, 1.0)))
}

/// Compute the normalized whitepoint for a color temperature in Kelvin.
///
/// Temperatures outside `1667..=25000` are rejected rather than clamped so a
/// misconfigured temperature is never silently replaced by another one.
pub fn whitepoint(temp: u32) -> Result<Whitepoint> {
    if !(MINIMUM_TEMP..=MAXIMUM_TEMP).contains(&temp) {
        bail!(
            "color temperature {}K is outside the supported range {}K-{}K",
            temp,
            MINIMUM_TEMP,
            MAXIMUM_TEMP
        );
    }
    if temp == NEUTRAL_TEMP {
        return Ok(Whitepoint::NEUTRAL);
    }

    let kelvin = temp as f64;
    let chromaticity = if temp < NEUTRAL_TEMP {
        planckian_locus(kelvin)
    } else {
        illuminant_d(kelvin)
    };

    let [r, g, b] = xyz_to_srgb(chromaticity);
    let max = r.max(g).max(b);
    Ok(Whitepoint {
        r: r / max,
        g: g / max,
        b: b / max,
    })
}

/// Per-output gamma ramp: three equal length channel curves stored
/// back to back (red, then green, then blue), as display servers expect.
#[derive(Debug, Clone, PartialEq)]
pub struct RampTable {
    ramp_size: usize,
    data: Vec<u16>,
}

impl RampTable {
    /// Allocate a zeroed table for a display announcing `ramp_size` entries.
    pub fn new(ramp_size: usize) -> Result<Self> {
        if ramp_size < 2 {
            bail!("ramp size must be at least 2 (got {})", ramp_size);
        }
        Ok(Self {
            ramp_size,
            data: vec![0; ramp_size * 3],
        })
    }

    pub fn ramp_size(&self) -> usize {
        self.ramp_size
    }

    pub fn red(&self) -> &[u16] {
        &self.data[..self.ramp_size]
    }

    pub fn green(&self) -> &[u16] {
        &self.data[self.ramp_size..2 * self.ramp_size]
    }

    pub fn blue(&self) -> &[u16] {
        &self.data[2 * self.ramp_size..]
    }

    /// Native-endian bytes of the table, ready to be written to a shared buffer.
    pub fn to_ne_bytes(&self) -> Vec<u8> {
        self.data.iter().flat_map(|v| v.to_ne_bytes()).collect()
    }

    /// Refill this table in place for a whitepoint and gamma.
    pub fn fill(&mut self, wp: &Whitepoint, gamma: f64) -> Result<()> {
        fill_ramp_table(&mut self.data, self.ramp_size, wp, gamma)
    }
}

/// Fill caller-provided storage with a gamma-corrected ramp.
///
/// `buf` must hold exactly `3 * ramp_size` entries. Entry `i` of channel `c`
/// is `round(65535 * (i / (ramp_size - 1) * wp_c) ^ (1 / gamma))`.
pub fn fill_ramp_table(buf: &mut [u16], ramp_size: usize, wp: &Whitepoint, gamma: f64) -> Result<()> {
    if ramp_size < 2 {
        bail!("ramp size must be at least 2 (got {})", ramp_size);
    }
    if buf.len() != ramp_size * 3 {
        bail!(
            "ramp buffer holds {} entries, expected {} for ramp size {}",
            buf.len(),
            ramp_size * 3,
            ramp_size
        );
    }
    if !(gamma.is_finite() && gamma > 0.0) {
        bail!("gamma must be a positive number (got {})", gamma);
    }

    let exponent = 1.0 / gamma;
    let last = (ramp_size - 1) as f64;
    for (channel, scale) in buf.chunks_exact_mut(ramp_size).zip(wp.channels()) {
        for (i, entry) in channel.iter_mut().enumerate() {
            let val = i as f64 / last;
            *entry = (MAX_CHANNEL_VALUE * (val * scale).powf(exponent)).round() as u16;
        }
    }
    Ok(())
}

/// Build a fresh ramp table for a whitepoint.
pub fn ramp_table(wp: &Whitepoint, gamma: f64, ramp_size: usize) -> Result<RampTable> {
    let mut table = RampTable::new(ramp_size)?;
    table.fill(wp, gamma)?;
    Ok(table)
}

/// Convenience: whitepoint and ramp for a temperature in one call.
pub fn create_gamma_table(ramp_size: usize, temperature: u32, gamma: f64) -> Result<RampTable> {
    let wp = whitepoint(temperature)?;
    ramp_table(&wp, gamma, ramp_size)
}
