use chrono::{DateTime, Utc};
use ndarray::{s, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

use crate::prelude::{check_len, DisplayError, DisplayResult};
use crate::radar::field::FieldData;

/// Descriptive attributes of the radar volume.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RadarMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_type: Option<String>,
}

/// An airborne radar volume: gate geometry, per-ray platform attitude and
/// moment fields.
///
/// Angles are in degrees, ranges and altitudes in meters. Sweep end indices
/// are inclusive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AirborneRadar {
    pub time_begin: DateTime<Utc>,
    pub scan_type: String,
    #[serde(default)]
    pub metadata: RadarMetadata,
    pub ranges: Vec<f64>,
    pub azimuth: Vec<f64>,
    pub elevation: Vec<f64>,
    pub rotation: Vec<f64>,
    pub roll: Vec<f64>,
    pub drift: Vec<f64>,
    pub tilt: Vec<f64>,
    pub pitch: Vec<f64>,
    pub heading: Vec<f64>,
    pub altitude: Vec<f64>,
    pub latitude: Vec<f64>,
    pub longitude: Vec<f64>,
    pub fixed_angle: Vec<f64>,
    pub sweep_start_ray_index: Vec<usize>,
    pub sweep_end_ray_index: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antenna_transition: Option<Vec<u8>>,
    pub fields: BTreeMap<String, FieldData>,
}

impl AirborneRadar {
    pub fn nrays(&self) -> usize {
        self.rotation.len()
    }

    pub fn ngates(&self) -> usize {
        self.ranges.len()
    }

    pub fn nsweeps(&self) -> usize {
        self.sweep_start_ray_index.len()
    }

    /// Ray indices belonging to `sweep`.
    pub fn get_slice(&self, sweep: usize) -> DisplayResult<Range<usize>> {
        let nsweeps = self.nsweeps();
        let (start, end) = self
            .sweep_start_ray_index
            .get(sweep)
            .zip(self.sweep_end_ray_index.get(sweep))
            .ok_or(DisplayError::SweepOutOfRange { sweep, nsweeps })?;
        Ok(*start..*end + 1)
    }

    pub fn field(&self, name: &str) -> DisplayResult<&FieldData> {
        self.fields
            .get(name)
            .ok_or_else(|| DisplayError::MissingField(name.to_string()))
    }

    /// Field rows for `sweep`, copied out of the volume.
    pub fn sweep_data(&self, name: &str, sweep: usize) -> DisplayResult<Array2<f64>> {
        let field = self.field(name)?;
        let rays = self.get_slice(sweep)?;
        let (nrays, _) = field.data.dim();
        if rays.end > nrays {
            return Err(DisplayError::ShapeMismatch {
                what: format!("field {name} rays"),
                expected: rays.end,
                found: nrays,
            });
        }
        Ok(field.data.slice(s![rays, ..]).to_owned())
    }

    /// Offsets, relative to the sweep start, of rays recorded while the antenna
    /// was not in transition. Every ray is kept when no flags are present.
    pub fn steady_rays(&self, sweep: usize) -> DisplayResult<Vec<usize>> {
        let rays = self.get_slice(sweep)?;
        let kept = match &self.antenna_transition {
            Some(flags) => {
                check_len("antenna_transition", self.nrays(), flags.len())?;
                flags[rays]
                    .iter()
                    .enumerate()
                    .filter(|(_, &flag)| flag == 0)
                    .map(|(offset, _)| offset)
                    .collect()
            }
            None => (0..rays.len()).collect(),
        };
        Ok(kept)
    }

    /// Consistency check of every per-ray vector, field and sweep bound.
    pub fn validate(&self) -> DisplayResult<()> {
        let nrays = self.nrays();
        let ngates = self.ngates();
        for (what, len) in [
            ("azimuth", self.azimuth.len()),
            ("elevation", self.elevation.len()),
            ("roll", self.roll.len()),
            ("drift", self.drift.len()),
            ("tilt", self.tilt.len()),
            ("pitch", self.pitch.len()),
            ("heading", self.heading.len()),
            ("altitude", self.altitude.len()),
            ("latitude", self.latitude.len()),
            ("longitude", self.longitude.len()),
        ] {
            check_len(what, nrays, len)?;
        }
        if let Some(flags) = &self.antenna_transition {
            check_len("antenna_transition", nrays, flags.len())?;
        }
        check_len(
            "sweep_end_ray_index",
            self.nsweeps(),
            self.sweep_end_ray_index.len(),
        )?;
        check_len("fixed_angle", self.nsweeps(), self.fixed_angle.len())?;
        for (sweep, (&start, &end)) in self
            .sweep_start_ray_index
            .iter()
            .zip(self.sweep_end_ray_index.iter())
            .enumerate()
        {
            if start > end || end >= nrays {
                return Err(DisplayError::InvalidInput(format!(
                    "sweep {sweep} spans rays {start}..={end} of {nrays}"
                )));
            }
        }
        for (name, field) in &self.fields {
            check_len(&format!("field {name} rays"), nrays, field.data.len_of(Axis(0)))?;
            check_len(&format!("field {name} gates"), ngates, field.data.len_of(Axis(1)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Two sweeps of three rays and four gates; the first ray of the second
    /// sweep is flagged as a transition.
    pub(crate) fn sample_radar() -> AirborneRadar {
        let nrays = 6;
        let ngates = 4;
        let reflectivity = Array2::from_shape_fn((nrays, ngates), |(ray, gate)| {
            (ray * 10 + gate) as f64
        });
        let ncp = Array2::from_shape_fn((nrays, ngates), |(_, gate)| gate as f64 * 0.3);
        let mut fields = BTreeMap::new();
        fields.insert(
            "reflectivity".to_string(),
            FieldData::new(reflectivity)
                .with_units("dBZ")
                .with_standard_name("equivalent_reflectivity_factor"),
        );
        fields.insert(
            "ncp".to_string(),
            FieldData::new(ncp).with_long_name("normalized_coherent_power"),
        );
        AirborneRadar {
            time_begin: Utc.with_ymd_and_hms(2013, 6, 10, 12, 30, 5).unwrap(),
            scan_type: "rhi".into(),
            metadata: RadarMetadata {
                instrument_name: Some("TDR".into()),
                platform_type: Some("aircraft_tail".into()),
            },
            ranges: vec![150.0, 300.0, 450.0, 600.0],
            azimuth: vec![0.0, 90.0, 180.0, 0.0, 90.0, 180.0],
            elevation: vec![0.0; nrays],
            rotation: vec![0.0, 90.0, 180.0, 0.0, 90.0, 180.0],
            roll: vec![0.0; nrays],
            drift: vec![0.0; nrays],
            tilt: vec![0.0; nrays],
            pitch: vec![0.0; nrays],
            heading: vec![0.0; nrays],
            altitude: vec![3000.0; nrays],
            latitude: vec![25.0, 25.1, 25.2, 25.3, 25.4, 25.5],
            longitude: vec![-80.0, -80.1, -80.2, -80.3, -80.4, -80.5],
            fixed_angle: vec![-20.0, 20.0],
            sweep_start_ray_index: vec![0, 3],
            sweep_end_ray_index: vec![2, 5],
            antenna_transition: Some(vec![0, 0, 0, 1, 0, 0]),
            fields,
        }
    }

    #[test]
    fn sample_radar_is_consistent() {
        sample_radar().validate().unwrap();
    }

    #[test]
    fn get_slice_uses_inclusive_end() {
        let radar = sample_radar();
        assert_eq!(radar.get_slice(1).unwrap(), 3..6);
        assert_eq!(
            radar.get_slice(2).unwrap_err(),
            DisplayError::SweepOutOfRange {
                sweep: 2,
                nsweeps: 2
            }
        );
    }

    #[test]
    fn sweep_data_copies_sweep_rows() {
        let radar = sample_radar();
        let data = radar.sweep_data("reflectivity", 1).unwrap();
        assert_eq!(data.dim(), (3, 4));
        assert_eq!(data[(0, 2)], 32.0);
        assert_eq!(
            radar.sweep_data("velocity", 0).unwrap_err(),
            DisplayError::MissingField("velocity".into())
        );
    }

    #[test]
    fn steady_rays_skip_transitions() {
        let mut radar = sample_radar();
        assert_eq!(radar.steady_rays(0).unwrap(), vec![0, 1, 2]);
        assert_eq!(radar.steady_rays(1).unwrap(), vec![1, 2]);
        radar.antenna_transition = None;
        assert_eq!(radar.steady_rays(1).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn validate_flags_short_attitude_vectors() {
        let mut radar = sample_radar();
        radar.pitch.pop();
        assert_eq!(
            radar.validate().unwrap_err(),
            DisplayError::ShapeMismatch {
                what: "pitch".into(),
                expected: 6,
                found: 5
            }
        );
    }

    #[test]
    fn validate_flags_bad_field_shape() {
        let mut radar = sample_radar();
        radar
            .fields
            .insert("bad".into(), FieldData::new(Array2::zeros((6, 3))));
        assert!(matches!(
            radar.validate(),
            Err(DisplayError::ShapeMismatch { found: 3, .. })
        ));
    }

    #[test]
    fn radar_survives_json() {
        let radar = sample_radar();
        let text = serde_json::to_string(&radar).unwrap();
        let parsed: AirborneRadar = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.time_begin, radar.time_begin);
        assert_eq!(parsed.fields["reflectivity"].units.as_deref(), Some("dBZ"));
    }
}
