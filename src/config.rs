//! Detector and event configuration.
//!
//! All fields have defaults matching a large water Cherenkov tank; a JSON document
//! only needs to name the fields it overrides.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default cylinder radius.
pub const DEFAULT_RADIUS: f64 = 40.0;
/// Default cylinder height.
pub const DEFAULT_HEIGHT: f64 = 80.0;
/// Default number of sensors requested from the geometry builder.
pub const DEFAULT_SENSOR_COUNT: usize = 12_000;
/// Minimum active-sensor count after a neutron event.
pub const DEFAULT_NEUTRON_HIT_QUOTA: usize = 300;
/// Cherenkov cone half-angle in radians.
pub const DEFAULT_CHERENKOV_ANGLE: f64 = std::f64::consts::FRAC_PI_4;

/// Which tracks the light-beam linker scans for the point nearest each active sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeamOrigin {
    /// Primary track only, including neutron events whose hits come from secondaries.
    #[default]
    PrimaryTrack,
    /// Primary track and every secondary track.
    NearestTrack,
}

/// Detector dimensions and event constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Cylinder radius (> 0). Scales every distance threshold.
    pub radius: f64,
    /// Cylinder height (> 0), axis along Y, centered at the origin.
    pub height: f64,
    /// Requested sensor count; the placed count may differ slightly.
    pub sensor_count: usize,
    /// Neutron events top up to at least this many active sensors.
    pub neutron_hit_quota: usize,
    /// Cherenkov cone half-angle in radians.
    pub cherenkov_angle: f64,
    /// Track selection for light beams.
    pub beam_origin: BeamOrigin,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            height: DEFAULT_HEIGHT,
            sensor_count: DEFAULT_SENSOR_COUNT,
            neutron_hit_quota: DEFAULT_NEUTRON_HIT_QUOTA,
            cherenkov_angle: DEFAULT_CHERENKOV_ANGLE,
            beam_origin: BeamOrigin::default(),
        }
    }
}

impl DetectorConfig {
    /// Default configuration with the given detector shape.
    pub fn with_shape(radius: f64, height: f64, sensor_count: usize) -> Self {
        Self {
            radius,
            height,
            sensor_count,
            ..Self::default()
        }
    }

    /// Check every field.
    ///
    /// Errors:
    /// - `Error::InvalidConfiguration` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        validate_dimensions(self.radius, self.height)?;
        validate_sensor_count(self.sensor_count)?;
        if !self.cherenkov_angle.is_finite()
            || self.cherenkov_angle <= 0.0
            || self.cherenkov_angle >= std::f64::consts::PI
        {
            return Err(Error::InvalidConfiguration(
                "cherenkov_angle must be finite and in (0, pi)".into(),
            ));
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON document over the defaults and validate it.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Cylinder dimensions shared by the config and the geometry.
pub(crate) fn validate_dimensions(radius: f64, height: f64) -> Result<()> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(Error::InvalidConfiguration(
            "radius must be finite and > 0".into(),
        ));
    }
    if !height.is_finite() || height <= 0.0 {
        return Err(Error::InvalidConfiguration(
            "height must be finite and > 0".into(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_sensor_count(sensor_count: usize) -> Result<()> {
    if sensor_count == 0 {
        return Err(Error::InvalidConfiguration(
            "sensor_count must be > 0".into(),
        ));
    }
    Ok(())
}
