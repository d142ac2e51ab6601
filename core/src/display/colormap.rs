use std::{fmt, str::FromStr};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::prelude::DisplayError;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct RgbColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl RgbColor {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl From<&[u8; 3]> for RgbColor {
    fn from(value: &[u8; 3]) -> Self {
        let [red, green, blue] = *value;
        Self { red, green, blue }
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl FromStr for RgbColor {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const MESSAGE: &str = r##"color must be in specified in hexadecimal numbers like "#ffffff""##;

        if s.len() != 7 || !s.starts_with('#') {
            return Err(MESSAGE);
        }
        let digits = s[1..]
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<Vec<_>>>()
            .ok_or(MESSAGE)?;
        let bytes = digits
            .into_iter()
            .tuples()
            .map(|(hi, lo)| (hi << 4) | lo)
            .collect::<Vec<_>>();
        match bytes.as_slice() {
            [red, green, blue] => Ok(Self::new(*red, *green, *blue)),
            _ => Err(MESSAGE),
        }
    }
}

// Thresholds are kept in ascending order.
#[derive(Debug, PartialEq, Clone)]
pub struct ListedColorMap(pub Vec<(f64, RgbColor)>);

impl ListedColorMap {
    /// Color of the highest threshold strictly below `value`.
    pub fn get_rgb(&self, value: f64) -> Option<&RgbColor> {
        if value.is_nan() {
            return None;
        }
        let Self(inner) = self;
        inner
            .iter()
            .rev()
            .find_map(|(threshold, color)| (value > *threshold).then_some(color))
    }
}

impl FromStr for ListedColorMap {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Result<Vec<_>, _> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                let (key, value) = line
                    .split_once(':')
                    .ok_or("key/value must be separated by a colon")?;
                let key = key
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| "parsing a float value failed")?;
                let value = value.trim().parse::<RgbColor>()?;
                Ok((key, value))
            })
            .collect();
        let mut lines = lines?;
        lines.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(Self(lines))
    }
}

impl fmt::Display for ListedColorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(inner) = self;
        let text = inner
            .iter()
            .map(|(threshold, color)| format!("{threshold}:{color}"))
            .join("\n");
        f.write_str(&text)
    }
}

/// Color mapping used for a mesh and its colorbar.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Colormap {
    #[default]
    Jet,
    Viridis,
    Greys,
    /// Discrete thresholds applied to raw, unnormalised values.
    Listed(ListedColorMap),
}

impl FromStr for Colormap {
    type Err = DisplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jet" => Ok(Self::Jet),
            "viridis" => Ok(Self::Viridis),
            "greys" | "gray" | "grey" => Ok(Self::Greys),
            _ if s.contains(':') => s
                .parse::<ListedColorMap>()
                .map(Self::Listed)
                .map_err(|err| DisplayError::InvalidInput(format!("listed colormap: {err}"))),
            other => Err(DisplayError::InvalidInput(format!("unknown colormap {other}"))),
        }
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jet => f.write_str("jet"),
            Self::Viridis => f.write_str("viridis"),
            Self::Greys => f.write_str("greys"),
            Self::Listed(listed) => write!(f, "{listed}"),
        }
    }
}

impl TryFrom<String> for Colormap {
    type Error = DisplayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Colormap> for String {
    fn from(value: Colormap) -> Self {
        value.to_string()
    }
}
