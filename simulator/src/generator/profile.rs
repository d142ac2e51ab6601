use anyhow::Context;
use chrono::{DateTime, TimeZone, Utc};
use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use sweepcore::radar::{AirborneRadar, FieldData, RadarMetadata};

const METERS_PER_DEGREE_LATITUDE: f64 = 111_320.0;

/// Configuration for generating a synthetic airborne volume.
///
/// Every sweep is one full antenna rotation; consecutive sweeps cycle through
/// `tilts`, which gives the fore/aft pattern of a tail radar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SweepGeneratorConfig {
    pub instrument_name: String,
    pub platform_type: String,
    pub scan_type: String,
    pub time_begin: DateTime<Utc>,
    pub sweeps: usize,
    pub rays_per_sweep: usize,
    pub gates: usize,
    pub first_gate: f64,
    pub gate_spacing: f64,
    pub tilts: Vec<f64>,
    pub roll: f64,
    pub pitch: f64,
    pub drift: f64,
    pub heading: f64,
    pub altitude: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Meters travelled between consecutive rays.
    pub ray_spacing: f64,
    /// Height in meters where echo fades out.
    pub echo_top: f64,
    pub noise: f64,
    pub seed: u64,
}

impl Default for SweepGeneratorConfig {
    fn default() -> Self {
        Self {
            instrument_name: "TDR".into(),
            platform_type: "aircraft_tail".into(),
            scan_type: "rhi".into(),
            time_begin: Utc
                .timestamp_opt(1_370_867_405, 0)
                .single()
                .unwrap_or_default(),
            sweeps: 2,
            rays_per_sweep: 360,
            gates: 200,
            first_gate: 150.0,
            gate_spacing: 150.0,
            tilts: vec![-20.0, 20.0],
            roll: 0.0,
            pitch: 0.0,
            drift: 0.0,
            heading: 0.0,
            altitude: 3_000.0,
            latitude: 25.0,
            longitude: -80.0,
            ray_spacing: 2.0,
            echo_top: 12_000.0,
            noise: 1.0,
            seed: 0,
        }
    }
}

impl SweepGeneratorConfig {
    fn fixed_angle(&self, sweep: usize) -> f64 {
        match self.tilts.len() {
            0 => 0.0,
            len => self.tilts[sweep % len],
        }
    }
}

/// Per-gate echo model shared by the moment fields.
struct Echo {
    reflectivity: f64,
    velocity: f64,
    ncp: f64,
}

fn echo_at(config: &SweepGeneratorConfig, rotation: f64, tilt: f64, range: f64) -> Option<Echo> {
    let (rot, tilt) = (rotation.to_radians(), tilt.to_radians());
    let height = config.altitude + range * rot.cos() * tilt.cos();
    if height < 0.0 {
        return None;
    }
    let across = range * rot.sin() * tilt.cos();
    let fade = (1.0 - height / config.echo_top.max(1.0)).max(0.0);
    let band = (across / 4_000.0).cos().abs();
    let max_range = config.first_gate + config.gate_spacing * config.gates as f64;
    Some(Echo {
        reflectivity: -10.0 + 55.0 * fade * band,
        velocity: 20.0 * rot.sin() * fade,
        ncp: 1.0 - 0.8 * (range / max_range.max(1.0)),
    })
}

/// Builds a deterministic airborne volume from `config`.
pub fn build_sweeps(config: &SweepGeneratorConfig) -> anyhow::Result<AirborneRadar> {
    let rays_per_sweep = config.rays_per_sweep.max(1);
    let nsweeps = config.sweeps.max(1);
    let ngates = config.gates.max(1);
    let nrays = rays_per_sweep
        .checked_mul(nsweeps)
        .context("overflow computing ray count for generator")?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let ranges = (0..ngates)
        .map(|gate| config.first_gate + config.gate_spacing * gate as f64)
        .collect::<Vec<_>>();
    let step = 360.0 / rays_per_sweep as f64;
    let rotation = (0..nrays)
        .map(|ray| (ray % rays_per_sweep) as f64 * step)
        .collect::<Vec<_>>();
    let tilt = (0..nrays)
        .map(|ray| config.fixed_angle(ray / rays_per_sweep))
        .collect::<Vec<_>>();

    let mut reflectivity = Array2::from_elem((nrays, ngates), f64::NAN);
    let mut velocity = Array2::from_elem((nrays, ngates), f64::NAN);
    let mut ncp = Array2::zeros((nrays, ngates));
    for ray in 0..nrays {
        for (gate, &range) in ranges.iter().enumerate() {
            let jitter = if config.noise > 0.0 {
                rng.gen_range(-config.noise..config.noise)
            } else {
                0.0
            };
            // gates below the surface stay missing
            if let Some(echo) = echo_at(config, rotation[ray], tilt[ray], range) {
                reflectivity[(ray, gate)] = echo.reflectivity + jitter;
                velocity[(ray, gate)] = echo.velocity + jitter * 0.5;
                ncp[(ray, gate)] = echo.ncp;
            }
        }
    }

    let heading = config.heading.to_radians();
    let track = |ray: usize| config.ray_spacing * ray as f64 / METERS_PER_DEGREE_LATITUDE;
    let latitude = (0..nrays)
        .map(|ray| config.latitude + track(ray) * heading.cos())
        .collect::<Vec<_>>();
    let longitude = (0..nrays)
        .map(|ray| {
            config.longitude + track(ray) * heading.sin() / config.latitude.to_radians().cos()
        })
        .collect::<Vec<_>>();

    let mut transition = vec![0u8; nrays];
    for sweep in 1..nsweeps {
        transition[sweep * rays_per_sweep] = 1;
    }

    let mut fields = BTreeMap::new();
    fields.insert(
        "reflectivity".to_string(),
        FieldData::new(reflectivity)
            .with_units("dBZ")
            .with_standard_name("equivalent_reflectivity_factor"),
    );
    fields.insert(
        "velocity".to_string(),
        FieldData::new(velocity)
            .with_units("m/s")
            .with_standard_name("radial_velocity_of_scatterers_away_from_instrument"),
    );
    fields.insert(
        "normalized_coherent_power".to_string(),
        FieldData::new(ncp)
            .with_units("ratio")
            .with_long_name("normalized_coherent_power"),
    );

    let radar = AirborneRadar {
        time_begin: config.time_begin,
        scan_type: config.scan_type.clone(),
        metadata: RadarMetadata {
            instrument_name: Some(config.instrument_name.clone()),
            platform_type: Some(config.platform_type.clone()),
        },
        ranges,
        azimuth: rotation.clone(),
        elevation: tilt.clone(),
        rotation,
        roll: vec![config.roll; nrays],
        drift: vec![config.drift; nrays],
        tilt,
        pitch: vec![config.pitch; nrays],
        heading: vec![config.heading; nrays],
        altitude: vec![config.altitude; nrays],
        latitude,
        longitude,
        fixed_angle: (0..nsweeps).map(|sweep| config.fixed_angle(sweep)).collect(),
        sweep_start_ray_index: (0..nsweeps).map(|sweep| sweep * rays_per_sweep).collect(),
        sweep_end_ray_index: (0..nsweeps)
            .map(|sweep| (sweep + 1) * rays_per_sweep - 1)
            .collect(),
        antenna_transition: Some(transition),
        fields,
    };
    radar
        .validate()
        .context("generated volume is inconsistent")?;
    Ok(radar)
}
