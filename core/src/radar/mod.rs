pub mod field;
pub mod scan;
pub mod sweep;

pub use field::FieldData;
pub use scan::{PlatformType, ScanType};
pub use sweep::{AirborneRadar, RadarMetadata};
