use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fmt::Display;
use std::ops::Range;

use sweepcore::math::StatsHelper;
use sweepcore::prelude::{
    Colorbar, ColorbarOrientation, DisplayError, DisplayResult, MeshPlot, PlotSurface,
};

use crate::palette::ColorScale;

const METERS_PER_KM: f64 = 1_000.0;
const COLORBAR_STEPS: usize = 128;
/// Share of the canvas kept for the mesh when a colorbar is attached.
const PLOT_SHARE: f64 = 0.85;

fn render_error<E: Display>(err: E) -> DisplayError {
    DisplayError::Render(err.to_string())
}

/// Widens an empty or inverted range so plotters can map it.
fn padded(lo: f64, hi: f64) -> Range<f64> {
    if hi > lo {
        lo..hi
    } else {
        lo - 0.5..lo + 0.5
    }
}

/// Plot surface that collects meshes and decorations, then draws them onto a
/// `plotters` drawing area in kilometers.
///
/// Text is only rendered for a title, axis labels or a non-empty colorbar
/// label, so undecorated plots need no fonts.
#[derive(Debug, Default)]
pub struct ChartSurface {
    title: Option<String>,
    xlabel: Option<String>,
    ylabel: Option<String>,
    meshes: Vec<MeshPlot>,
    colorbar: Option<Colorbar>,
}

impl ChartSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn meshes(&self) -> &[MeshPlot] {
        &self.meshes
    }

    pub fn colorbar_staged(&self) -> Option<&Colorbar> {
        self.colorbar.as_ref()
    }

    /// Draws everything staged so far onto `root` and flushes it.
    pub fn present<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DisplayResult<()> {
        root.fill(&WHITE).map_err(render_error)?;
        let (width, height) = root.dim_in_pixel();
        match &self.colorbar {
            Some(colorbar) => {
                let (plot_area, bar_area) = match colorbar.orientation {
                    ColorbarOrientation::Vertical => {
                        root.split_horizontally((width as f64 * PLOT_SHARE) as u32)
                    }
                    ColorbarOrientation::Horizontal => {
                        root.split_vertically((height as f64 * PLOT_SHARE) as u32)
                    }
                };
                self.draw_meshes(&plot_area)?;
                draw_colorbar(&bar_area, colorbar)?;
            }
            None => self.draw_meshes(root)?,
        }
        debug!(
            "presented {} meshes on a {width}x{height} canvas",
            self.meshes.len()
        );
        root.present().map_err(render_error)
    }

    /// Bounds of every finite corner of the staged meshes, in kilometers.
    fn extent(&self) -> (Range<f64>, Range<f64>) {
        let bounds = |values: Vec<f64>| {
            let (lo, hi) = StatsHelper::finite_min_max(&values).unwrap_or((-1.0, 1.0));
            padded(lo, hi)
        };
        let xs = self
            .meshes
            .iter()
            .flat_map(|mesh| mesh.x.iter())
            .map(|x| x / METERS_PER_KM)
            .collect();
        let ys = self
            .meshes
            .iter()
            .flat_map(|mesh| mesh.y.iter())
            .map(|y| y / METERS_PER_KM)
            .collect();
        (bounds(xs), bounds(ys))
    }

    fn draw_meshes<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> DisplayResult<()> {
        let (x_range, y_range) = self.extent();
        let labelled = self.xlabel.is_some() || self.ylabel.is_some();

        let mut builder = ChartBuilder::on(area);
        builder.margin(10);
        if let Some(title) = &self.title {
            builder.caption(title, ("sans-serif", 18));
        }
        if labelled {
            builder.x_label_area_size(40).y_label_area_size(50);
        }
        let mut chart = builder
            .build_cartesian_2d(x_range, y_range)
            .map_err(render_error)?;

        if labelled {
            chart
                .configure_mesh()
                .disable_mesh()
                .x_desc(self.xlabel.clone().unwrap_or_default())
                .y_desc(self.ylabel.clone().unwrap_or_default())
                .draw()
                .map_err(render_error)?;
        }

        for mesh in &self.meshes {
            chart.draw_series(mesh_cells(mesh)).map_err(render_error)?;
        }
        Ok(())
    }
}

impl PlotSurface for ChartSurface {
    fn pcolormesh(&mut self, mesh: &MeshPlot) -> DisplayResult<()> {
        if mesh.x.dim() != mesh.y.dim() {
            return Err(DisplayError::ShapeMismatch {
                what: format!("{} mesh corners", mesh.field),
                expected: mesh.x.len(),
                found: mesh.y.len(),
            });
        }
        self.meshes.push(mesh.clone());
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn set_xlabel(&mut self, label: &str) {
        self.xlabel = Some(label.to_string());
    }

    fn set_ylabel(&mut self, label: &str) {
        self.ylabel = Some(label.to_string());
    }

    fn colorbar(&mut self, colorbar: &Colorbar) -> DisplayResult<()> {
        self.colorbar = Some(colorbar.clone());
        Ok(())
    }
}

/// One filled quadrilateral per visible cell.
fn mesh_cells(mesh: &MeshPlot) -> Vec<Polygon<(f64, f64)>> {
    let scale = ColorScale::new(&mesh.cmap, mesh.vmin, mesh.vmax);
    let corner = |row: usize, col: usize| {
        (
            mesh.x[(row, col)] / METERS_PER_KM,
            mesh.y[(row, col)] / METERS_PER_KM,
        )
    };
    let (rows, cols) = mesh.cell_dim();
    let mut cells = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let Some(color) = mesh.data.get(row, col).and_then(|value| scale.color(value)) else {
                continue;
            };
            let points = vec![
                corner(row, col),
                corner(row + 1, col),
                corner(row + 1, col + 1),
                corner(row, col + 1),
            ];
            if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
                continue;
            }
            cells.push(Polygon::new(points, color.filled()));
        }
    }
    cells
}

fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    colorbar: &Colorbar,
) -> DisplayResult<()> {
    let values = padded(colorbar.vmin, colorbar.vmax);
    let scale = ColorScale::new(&colorbar.cmap, colorbar.vmin, colorbar.vmax);
    let delta = (values.end - values.start) / COLORBAR_STEPS as f64;
    let bands = (0..COLORBAR_STEPS).filter_map(|step| {
        let v0 = values.start + delta * step as f64;
        let v1 = v0 + delta;
        scale.color((v0 + v1) * 0.5).map(|color| (v0, v1, color))
    });
    let labelled = !colorbar.label.is_empty();

    let mut builder = ChartBuilder::on(area);
    builder.margin(10);
    match colorbar.orientation {
        ColorbarOrientation::Vertical => {
            if labelled {
                builder.y_label_area_size(60);
            }
            let mut chart = builder
                .build_cartesian_2d(0.0..1.0, values.clone())
                .map_err(render_error)?;
            if labelled {
                chart
                    .configure_mesh()
                    .disable_x_axis()
                    .disable_mesh()
                    .y_desc(colorbar.label.as_str())
                    .draw()
                    .map_err(render_error)?;
            }
            chart
                .draw_series(bands.map(|(v0, v1, color)| {
                    Rectangle::new([(0.0, v0), (1.0, v1)], color.filled())
                }))
                .map_err(render_error)?;
        }
        ColorbarOrientation::Horizontal => {
            if labelled {
                builder.x_label_area_size(40);
            }
            let mut chart = builder
                .build_cartesian_2d(values.clone(), 0.0..1.0)
                .map_err(render_error)?;
            if labelled {
                chart
                    .configure_mesh()
                    .disable_y_axis()
                    .disable_mesh()
                    .x_desc(colorbar.label.as_str())
                    .draw()
                    .map_err(render_error)?;
            }
            chart
                .draw_series(bands.map(|(v0, v1, color)| {
                    Rectangle::new([(v0, 0.0), (v1, 1.0)], color.filled())
                }))
                .map_err(render_error)?;
        }
    }
    Ok(())
}
