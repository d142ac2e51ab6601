//! Sweep model, attitude geometry and display logic for airborne Doppler radars.
//!
//! A [`RadarDisplayAirborne`] georeferences the gates of a sweep from the
//! platform attitude and hands masked meshes to any [`PlotSurface`]; the
//! drawing itself lives in the `visualizer` crate.

pub mod display;
pub mod math;
pub mod prelude;
pub mod radar;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use display::{GridOptions, RadarDisplayAirborne};
pub use prelude::{DisplayError, DisplayResult, MeshPlot, PlotSurface};
pub use radar::AirborneRadar;
