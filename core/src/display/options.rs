use serde::{Deserialize, Serialize};

use crate::display::colormap::Colormap;
use crate::prelude::ColorbarOrientation;

/// Display options shared by the plan-view and sweep-grid renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// `(field, value)`: hide gates where `field` is below `value`.
    pub mask_tuple: Option<(String, f64)>,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    pub cmap: Colormap,
    /// Hide non-finite gates and gates outside `[vmin, vmax]`.
    pub mask_outside: bool,
    pub title: Option<String>,
    pub title_flag: bool,
    pub axislabels: (Option<String>, Option<String>),
    pub axislabels_flag: bool,
    pub colorbar_flag: bool,
    pub colorbar_label: Option<String>,
    pub colorbar_orient: Option<ColorbarOrientation>,
    /// Treat gate coordinates as centers and draw interpolated cell corners.
    pub edges: bool,
    /// Drop rays recorded while the antenna moved between sweeps.
    pub filter_transitions: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            mask_tuple: None,
            vmin: None,
            vmax: None,
            cmap: Colormap::Jet,
            mask_outside: true,
            title: None,
            title_flag: true,
            axislabels: (None, None),
            axislabels_flag: true,
            colorbar_flag: true,
            colorbar_label: None,
            colorbar_orient: None,
            edges: true,
            filter_transitions: true,
        }
    }
}

impl GridOptions {
    /// Options with every decoration turned off.
    pub fn bare() -> Self {
        Self {
            title_flag: false,
            axislabels_flag: false,
            colorbar_flag: false,
            ..Default::default()
        }
    }
}
