use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::display::colormap::Colormap;

/// Common error type for georeferencing and display operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DisplayError {
    #[error("unknown scan_type {0}")]
    UnknownScanType(String),
    #[error("shape mismatch for {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        found: usize,
    },
    #[error("sweep {sweep} out of range, radar has {nsweeps} sweeps")]
    SweepOutOfRange { sweep: usize, nsweeps: usize },
    #[error("missing field: {0}")]
    MissingField(String),
    #[error("invalid color limits: vmin {vmin} > vmax {vmax}")]
    InvalidLimits { vmin: f64, vmax: f64 },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("render failure: {0}")]
    Render(String),
}

pub type DisplayResult<T> = Result<T, DisplayError>;

pub(crate) fn check_len(what: &str, expected: usize, found: usize) -> DisplayResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(DisplayError::ShapeMismatch {
            what: what.to_string(),
            expected,
            found,
        })
    }
}

/// Gate values paired with a mask; `true` in `mask` hides the gate.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedGrid {
    pub values: Array2<f64>,
    pub mask: Array2<bool>,
}

impl MaskedGrid {
    pub fn new(values: Array2<f64>) -> Self {
        let mask = Array2::from_elem(values.raw_dim(), false);
        Self { values, mask }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        match self.mask.get((row, col)) {
            Some(false) => self.values.get((row, col)).copied(),
            _ => None,
        }
    }

    /// Values still visible after masking, in row-major order.
    pub fn unmasked(&self) -> impl Iterator<Item = f64> + '_ {
        self.values
            .iter()
            .zip(self.mask.iter())
            .filter(|(_, &masked)| !masked)
            .map(|(&value, _)| value)
    }

    pub fn masked_count(&self) -> usize {
        self.mask.iter().filter(|&&masked| masked).count()
    }
}

/// Which pair of Cartesian axes a mesh is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshAxes {
    /// Horizontal plan view, x against y.
    PlanXy,
    /// Vertical section, x against z.
    SectionXz,
}

/// A pseudocolor mesh ready to hand to a plotting surface.
///
/// `x` and `y` hold cell corners in meters. When they have the same shape as
/// `data` the last row and column of `data` are not drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPlot {
    pub field: String,
    pub axes: MeshAxes,
    pub x: Array2<f64>,
    pub y: Array2<f64>,
    pub data: MaskedGrid,
    pub vmin: f64,
    pub vmax: f64,
    pub cmap: Colormap,
}

impl MeshPlot {
    /// Number of drawable cells along each axis.
    pub fn cell_dim(&self) -> (usize, usize) {
        let (rows, cols) = self.x.dim();
        let (data_rows, data_cols) = self.data.dim();
        (
            rows.saturating_sub(1).min(data_rows),
            cols.saturating_sub(1).min(data_cols),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorbarOrientation {
    #[default]
    Vertical,
    Horizontal,
}

impl std::str::FromStr for ColorbarOrientation {
    type Err = DisplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertical" => Ok(Self::Vertical),
            "horizontal" => Ok(Self::Horizontal),
            other => Err(DisplayError::InvalidInput(format!(
                "unknown colorbar orientation {other}"
            ))),
        }
    }
}

/// Colorbar attached to a previously drawn mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Colorbar {
    pub field: Option<String>,
    pub label: String,
    pub orientation: ColorbarOrientation,
    pub vmin: f64,
    pub vmax: f64,
    pub cmap: Colormap,
}

/// Drawing target for display output.
///
/// Implementations delegate to a plotting library; the display only decides
/// what to draw.
pub trait PlotSurface {
    fn pcolormesh(&mut self, mesh: &MeshPlot) -> DisplayResult<()>;
    fn set_title(&mut self, title: &str);
    fn set_xlabel(&mut self, label: &str);
    fn set_ylabel(&mut self, label: &str);
    fn colorbar(&mut self, colorbar: &Colorbar) -> DisplayResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn masked_grid_hides_masked_values() {
        let mut grid = MaskedGrid::new(array![[1.0, 2.0], [3.0, 4.0]]);
        grid.mask[(0, 1)] = true;
        assert_eq!(grid.get(0, 1), None);
        assert_eq!(grid.get(1, 1), Some(4.0));
        assert_eq!(grid.unmasked().collect::<Vec<_>>(), vec![1.0, 3.0, 4.0]);
        assert_eq!(grid.masked_count(), 1);
    }

    #[test]
    fn shape_mismatch_reports_lengths() {
        let err = check_len("roll", 4, 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "shape mismatch for roll: expected 4, found 3"
        );
    }

    #[test]
    fn orientation_parses_case_insensitively() {
        assert_eq!(
            "Horizontal".parse::<ColorbarOrientation>().unwrap(),
            ColorbarOrientation::Horizontal
        );
        assert!("diagonal".parse::<ColorbarOrientation>().is_err());
    }
}
