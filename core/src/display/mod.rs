pub mod airborne;
pub mod colormap;
pub mod labels;
pub mod limits;
pub mod mask;
pub mod options;
pub mod state;

pub use airborne::RadarDisplayAirborne;
pub use colormap::{Colormap, ListedColorMap, RgbColor};
pub use limits::{parse_vmin_vmax, FieldLimits};
pub use options::GridOptions;
pub use state::{AttitudeVectors, DisplayState, GeoFrame};
