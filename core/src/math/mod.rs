pub mod edges;
pub mod geometry;
pub mod stats;

pub use edges::edges_2d;
pub use geometry::{
    antenna_to_cartesian, antenna_to_cartesian_earth_relative,
    antenna_to_cartesian_track_relative, CartesianGrid,
};
pub use stats::StatsHelper;
