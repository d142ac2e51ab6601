use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::math::geometry::{
    antenna_to_cartesian, antenna_to_cartesian_earth_relative,
    antenna_to_cartesian_track_relative, CartesianGrid,
};
use crate::prelude::{check_len, DisplayError, DisplayResult};
use crate::radar::{AirborneRadar, PlatformType};

/// Frame the gate coordinates are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoFrame {
    /// Azimuth/elevation geometry of a belly radar.
    Belly,
    /// Tail radar, y along the aircraft track.
    TrackRelative,
    /// Tail radar, y towards north using the heading.
    EarthRelative,
}

impl From<PlatformType> for GeoFrame {
    fn from(value: PlatformType) -> Self {
        match value {
            PlatformType::AircraftBelly => Self::Belly,
            PlatformType::AircraftTail => Self::TrackRelative,
        }
    }
}

/// Per-ray platform attitude copied out of the radar at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct AttitudeVectors {
    pub fixed_angle: f64,
    pub rotation: Vec<f64>,
    pub roll: Vec<f64>,
    pub drift: Vec<f64>,
    pub tilt: Vec<f64>,
    pub pitch: Vec<f64>,
    pub heading: Vec<f64>,
    pub altitude: Vec<f64>,
}

impl AttitudeVectors {
    pub fn capture(radar: &AirborneRadar) -> Self {
        Self {
            fixed_angle: radar.fixed_angle.first().copied().unwrap_or(f64::NAN),
            rotation: radar.rotation.clone(),
            roll: radar.roll.clone(),
            drift: radar.drift.clone(),
            tilt: radar.tilt.clone(),
            pitch: radar.pitch.clone(),
            heading: radar.heading.clone(),
            altitude: radar.altitude.clone(),
        }
    }
}

/// Everything a display fixes at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub attitude: AttitudeVectors,
    pub frame: GeoFrame,
    /// Horizontal offset in meters added to every x and y.
    pub shift: (f64, f64),
    /// `radar` when unshifted, `origin` otherwise.
    pub origin: String,
    pub radar_name: String,
    /// Latitude and longitude in degrees at the middle of the track.
    pub loc: (f64, f64),
}

impl DisplayState {
    pub fn new(radar: &AirborneRadar, shift: (f64, f64)) -> DisplayResult<Self> {
        let middle = |values: &[f64], what: &str| {
            values
                .get(values.len() / 2)
                .copied()
                .ok_or_else(|| DisplayError::InvalidInput(format!("radar has no {what} samples")))
        };
        let loc = (
            middle(&radar.latitude, "latitude")?,
            middle(&radar.longitude, "longitude")?,
        );
        let origin = if shift != (0.0, 0.0) { "origin" } else { "radar" };
        let platform = PlatformType::from_metadata(radar.metadata.platform_type.as_deref());
        Ok(Self {
            attitude: AttitudeVectors::capture(radar),
            frame: platform.into(),
            shift,
            origin: origin.to_string(),
            radar_name: radar.metadata.instrument_name.clone().unwrap_or_default(),
            loc,
        })
    }

    /// Shifted Cartesian coordinates of every gate in `rays`.
    pub fn georeference(&self, radar: &AirborneRadar, rays: Range<usize>) -> DisplayResult<CartesianGrid> {
        let attitude = &self.attitude;
        let nrays = attitude.rotation.len();
        if rays.end > nrays {
            return Err(DisplayError::ShapeMismatch {
                what: "rotation".into(),
                expected: rays.end,
                found: nrays,
            });
        }
        let per_ray = |values: &[f64], what: &str| -> DisplayResult<Vec<f64>> {
            check_len(what, nrays, values.len())?;
            Ok(values[rays.clone()].to_vec())
        };
        let grid = match self.frame {
            GeoFrame::Belly => antenna_to_cartesian(
                &radar.ranges,
                &per_ray(&radar.azimuth, "azimuth")?,
                &per_ray(&radar.elevation, "elevation")?,
            )?,
            GeoFrame::TrackRelative => antenna_to_cartesian_track_relative(
                &radar.ranges,
                &attitude.rotation[rays.clone()],
                &per_ray(&attitude.roll, "roll")?,
                &per_ray(&attitude.drift, "drift")?,
                &per_ray(&attitude.tilt, "tilt")?,
                &per_ray(&attitude.pitch, "pitch")?,
            )?,
            GeoFrame::EarthRelative => antenna_to_cartesian_earth_relative(
                &radar.ranges,
                &attitude.rotation[rays.clone()],
                &per_ray(&attitude.roll, "roll")?,
                &per_ray(&attitude.heading, "heading")?,
                &per_ray(&attitude.tilt, "tilt")?,
                &per_ray(&attitude.pitch, "pitch")?,
            )?,
        };
        Ok(grid.shifted(self.shift))
    }
}
