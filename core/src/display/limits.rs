use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::math::stats::StatsHelper;
use crate::prelude::{DisplayError, DisplayResult};
use crate::radar::FieldData;

/// Default color limits keyed by field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldLimits(pub BTreeMap<String, (f64, f64)>);

impl Default for FieldLimits {
    fn default() -> Self {
        let table = [
            ("reflectivity", (-30.0, 75.0)),
            ("velocity", (-30.0, 30.0)),
            ("spectrum_width", (0.0, 30.0)),
            ("differential_reflectivity", (-1.0, 8.0)),
            ("cross_correlation_ratio", (0.7, 1.0)),
            ("normalized_coherent_power", (0.0, 1.0)),
            ("differential_phase", (0.0, 180.0)),
        ];
        Self(
            table
                .into_iter()
                .map(|(name, limits)| (name.to_string(), limits))
                .collect(),
        )
    }
}

impl FieldLimits {
    pub fn get(&self, field: &str) -> Option<(f64, f64)> {
        self.0.get(field).copied()
    }

    /// Entries in `overrides` replace the ones already present.
    pub fn merged(mut self, overrides: &BTreeMap<String, (f64, f64)>) -> Self {
        self.0
            .extend(overrides.iter().map(|(name, limits)| (name.clone(), *limits)));
        self
    }
}

/// Resolves the color limits of a plot.
///
/// Each bound falls back from the explicit value to the field's valid range,
/// then the configured table, then the finite extent of `values`, then 0..1.
/// Non-finite or inverted limits are rejected.
pub fn parse_vmin_vmax<'a, I>(
    name: &str,
    field: &FieldData,
    limits: &FieldLimits,
    values: I,
    vmin: Option<f64>,
    vmax: Option<f64>,
) -> DisplayResult<(f64, f64)>
where
    I: IntoIterator<Item = &'a f64>,
{
    let table = limits.get(name);
    let mut vmin = vmin.or(field.valid_min).or(table.map(|(lo, _)| lo));
    let mut vmax = vmax.or(field.valid_max).or(table.map(|(_, hi)| hi));
    if vmin.is_none() || vmax.is_none() {
        let (lo, hi) = StatsHelper::finite_min_max(values).unwrap_or((0.0, 1.0));
        vmin = vmin.or(Some(lo));
        vmax = vmax.or(Some(hi));
    }
    let (vmin, vmax) = (vmin.unwrap_or(0.0), vmax.unwrap_or(1.0));
    if !vmin.is_finite() || !vmax.is_finite() || vmin > vmax {
        return Err(DisplayError::InvalidLimits { vmin, vmax });
    }
    Ok((vmin, vmax))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn field() -> FieldData {
        FieldData::new(array![[f64::NAN, -4.0], [12.0, 3.0]])
    }

    #[test]
    fn explicit_limits_win() {
        let limits = FieldLimits::default();
        let resolved =
            parse_vmin_vmax("reflectivity", &field(), &limits, &[], Some(-10.0), Some(60.0));
        assert_eq!(resolved.unwrap(), (-10.0, 60.0));
    }

    #[test]
    fn valid_range_beats_table() {
        let limits = FieldLimits::default();
        let field = field().with_valid_range(-5.0, 5.0);
        let resolved = parse_vmin_vmax("reflectivity", &field, &limits, &[], None, None);
        assert_eq!(resolved.unwrap(), (-5.0, 5.0));
    }

    #[test]
    fn table_then_data_extent() {
        let limits = FieldLimits::default();
        let data = field();
        assert_eq!(
            parse_vmin_vmax("reflectivity", &data, &limits, data.data.iter(), None, None)
                .unwrap(),
            (-30.0, 75.0)
        );
        assert_eq!(
            parse_vmin_vmax("DBZ", &data, &limits, data.data.iter(), None, Some(40.0)).unwrap(),
            (-4.0, 40.0)
        );
    }

    #[test]
    fn all_missing_data_falls_back_to_unit_range() {
        let limits = FieldLimits::default();
        let data = FieldData::new(array![[f64::NAN]]);
        assert_eq!(
            parse_vmin_vmax("DBZ", &data, &limits, data.data.iter(), None, None).unwrap(),
            (0.0, 1.0)
        );
    }

    #[test]
    fn inverted_limits_are_rejected() {
        let limits = FieldLimits::default();
        let err = parse_vmin_vmax("DBZ", &field(), &limits, &[], Some(5.0), Some(1.0));
        assert_eq!(
            err.unwrap_err(),
            DisplayError::InvalidLimits {
                vmin: 5.0,
                vmax: 1.0
            }
        );
    }

    #[test]
    fn non_finite_limits_are_rejected() {
        let limits = FieldLimits::default();
        let err = parse_vmin_vmax("DBZ", &field(), &limits, &[], Some(f64::NAN), Some(1.0));
        assert!(matches!(err, Err(DisplayError::InvalidLimits { vmax, .. }) if vmax == 1.0));
        let err = parse_vmin_vmax(
            "reflectivity",
            &field(),
            &limits,
            &[],
            None,
            Some(f64::INFINITY),
        );
        assert!(matches!(err, Err(DisplayError::InvalidLimits { .. })));
    }

    #[test]
    fn overrides_replace_defaults() {
        let mut overrides = BTreeMap::new();
        overrides.insert("reflectivity".to_string(), (0.0, 50.0));
        overrides.insert("DBZ".to_string(), (-20.0, 60.0));
        let limits = FieldLimits::default().merged(&overrides);
        assert_eq!(limits.get("reflectivity"), Some((0.0, 50.0)));
        assert_eq!(limits.get("DBZ"), Some((-20.0, 60.0)));
        assert_eq!(limits.get("velocity"), Some((-30.0, 30.0)));
    }
}
