use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::prelude::DisplayError;

/// Antenna scan strategy of a volume.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScanType {
    Ppi,
    Rhi,
    Vpt,
}

impl FromStr for ScanType {
    type Err = DisplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ppi" => Ok(Self::Ppi),
            "rhi" => Ok(Self::Rhi),
            "vpt" => Ok(Self::Vpt),
            other => Err(DisplayError::UnknownScanType(other.to_string())),
        }
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Ppi => "ppi",
            Self::Rhi => "rhi",
            Self::Vpt => "vpt",
        };
        f.write_str(tag)
    }
}

/// Mounting of the antenna on the aircraft.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlatformType {
    /// Belly radar scanning in azimuth like a ground radar.
    AircraftBelly,
    /// Tail radar rotating about the fuselage axis.
    #[default]
    AircraftTail,
}

impl PlatformType {
    /// `aircraft_belly` is the only tag with its own geometry; everything
    /// else is treated as a rotating tail radar.
    pub fn from_metadata(tag: Option<&str>) -> Self {
        match tag {
            Some("aircraft_belly") => Self::AircraftBelly,
            _ => Self::AircraftTail,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AircraftBelly => "aircraft_belly",
            Self::AircraftTail => "aircraft_tail",
        }
    }
}
