//! Drawing surface that renders sweep meshes and colorbars with `plotters`.

pub mod palette;
pub mod surface;

pub use palette::ColorScale;
pub use surface::ChartSurface;
