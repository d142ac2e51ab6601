use chrono::{DateTime, Utc};

use crate::radar::FieldData;

fn readable(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn time_label(time_begin: &DateTime<Utc>) -> String {
    format!("{}Z", time_begin.format("%Y-%m-%dT%H:%M:%S"))
}

/// Human readable field name used in titles.
pub fn generate_field_name(key: &str, field: &FieldData) -> String {
    readable(field.display_name(key))
}

pub fn generate_title(
    radar_name: &str,
    fixed_angle: f64,
    time_begin: &DateTime<Utc>,
    field_name: &str,
) -> String {
    format!(
        "{radar_name} {fixed_angle:.1} Deg. {} \n{field_name}",
        time_label(time_begin)
    )
}

pub fn generate_vpt_title(radar_name: &str, time_begin: &DateTime<Utc>, field_name: &str) -> String {
    format!("{radar_name} {} \n{field_name}", time_label(time_begin))
}

pub fn generate_colorbar_label(standard_name: &str, units: &str) -> String {
    format!("{} ({units})", standard_name.replace('_', " "))
}

/// Default colorbar label for a field: its name and units, `?` for unknown units.
pub fn field_colorbar_label(key: &str, field: &FieldData) -> String {
    generate_colorbar_label(field.display_name(key), field.units.as_deref().unwrap_or("?"))
}

pub fn horizontal_axis_label(origin: &str) -> String {
    format!("Horizontal distance from {origin} (km)")
}

pub fn altitude_axis_label() -> String {
    "Altitude (km)".to_string()
}
