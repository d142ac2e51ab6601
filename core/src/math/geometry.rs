//! Gate georeferencing for airborne radars.
//!
//! All functions take gate ranges in meters and per-ray angles in degrees and
//! return ray-by-gate Cartesian offsets in meters from the antenna.

use ndarray::Array2;

use crate::prelude::{check_len, DisplayResult};

/// Mean earth radius used by the 4/3 effective-earth propagation model.
pub const EARTH_RADIUS_METER: f64 = 6_371_000.0;

const EFFECTIVE_RADIUS_FACTOR: f64 = 4.0 / 3.0;

/// Ray-by-gate Cartesian coordinates of a set of gates.
#[derive(Debug, Clone, PartialEq)]
pub struct CartesianGrid {
    pub x: Array2<f64>,
    pub y: Array2<f64>,
    pub z: Array2<f64>,
}

impl CartesianGrid {
    pub fn dim(&self) -> (usize, usize) {
        self.x.dim()
    }

    /// Translates every gate horizontally; altitudes are untouched.
    pub fn shifted(mut self, (dx, dy): (f64, f64)) -> Self {
        self.x.mapv_inplace(|x| x + dx);
        self.y.mapv_inplace(|y| y + dy);
        self
    }

    /// Keeps only the listed rays, in order.
    pub fn select_rays(&self, rays: &[usize]) -> Self {
        let axis = ndarray::Axis(0);
        Self {
            x: self.x.select(axis, rays),
            y: self.y.select(axis, rays),
            z: self.z.select(axis, rays),
        }
    }
}

/// Attitude angles of one ray, already in radians.
#[derive(Clone, Copy)]
struct RayAngles {
    rotation_roll: f64,
    tilt: f64,
    pitch: f64,
    /// Drift for the track-relative frame, heading for the earth-relative one.
    yaw: f64,
}

fn per_gate<F>(ranges: &[f64], nrays: usize, mut unit: F) -> CartesianGrid
where
    F: FnMut(usize) -> [f64; 3],
{
    let ngates = ranges.len();
    let mut x = Array2::zeros((nrays, ngates));
    let mut y = Array2::zeros((nrays, ngates));
    let mut z = Array2::zeros((nrays, ngates));
    for ray in 0..nrays {
        let [ux, uy, uz] = unit(ray);
        for (gate, &r) in ranges.iter().enumerate() {
            x[(ray, gate)] = r * ux;
            y[(ray, gate)] = r * uy;
            z[(ray, gate)] = r * uz;
        }
    }
    CartesianGrid { x, y, z }
}

fn angles(
    rotation: &[f64],
    roll: &[f64],
    yaw: &[f64],
    tilt: &[f64],
    pitch: &[f64],
    yaw_name: &str,
) -> DisplayResult<Vec<RayAngles>> {
    let nrays = rotation.len();
    check_len("roll", nrays, roll.len())?;
    check_len(yaw_name, nrays, yaw.len())?;
    check_len("tilt", nrays, tilt.len())?;
    check_len("pitch", nrays, pitch.len())?;
    Ok((0..nrays)
        .map(|ray| RayAngles {
            rotation_roll: (rotation[ray] + roll[ray]).to_radians(),
            tilt: tilt[ray].to_radians(),
            pitch: pitch[ray].to_radians(),
            yaw: yaw[ray].to_radians(),
        })
        .collect())
}

/// Belly radar geometry: azimuth/elevation scanning with beam bending under
/// a 4/3 effective earth radius.
pub fn antenna_to_cartesian(
    ranges: &[f64],
    azimuths: &[f64],
    elevations: &[f64],
) -> DisplayResult<CartesianGrid> {
    check_len("elevation", azimuths.len(), elevations.len())?;
    let r_eff = EARTH_RADIUS_METER * EFFECTIVE_RADIUS_FACTOR;
    let nrays = azimuths.len();
    let ngates = ranges.len();
    let mut x = Array2::zeros((nrays, ngates));
    let mut y = Array2::zeros((nrays, ngates));
    let mut z = Array2::zeros((nrays, ngates));
    for ray in 0..nrays {
        let az = azimuths[ray].to_radians();
        let el = elevations[ray].to_radians();
        for (gate, &r) in ranges.iter().enumerate() {
            let height = (r * r + r_eff * r_eff + 2.0 * r * r_eff * el.sin()).sqrt() - r_eff;
            let s = r_eff * ((r * el.cos()) / (r_eff + height)).asin();
            x[(ray, gate)] = s * az.sin();
            y[(ray, gate)] = s * az.cos();
            z[(ray, gate)] = height;
        }
    }
    Ok(CartesianGrid { x, y, z })
}

/// Tail radar geometry in a frame aligned with the aircraft track.
///
/// Rotation is measured from zenith about the fuselage axis, so rotation 0 with
/// level flight points straight up and 180 straight down.
pub fn antenna_to_cartesian_track_relative(
    ranges: &[f64],
    rotation: &[f64],
    roll: &[f64],
    drift: &[f64],
    tilt: &[f64],
    pitch: &[f64],
) -> DisplayResult<CartesianGrid> {
    let rays = angles(rotation, roll, drift, tilt, pitch, "drift")?;
    Ok(per_gate(ranges, rays.len(), |ray| {
        let RayAngles {
            rotation_roll: a,
            tilt: t,
            pitch: p,
            yaw: d,
        } = rays[ray];
        [
            a.cos() * d.sin() * t.cos() * p.sin() + d.cos() * a.sin() * t.cos()
                - d.sin() * p.cos() * t.sin(),
            -a.cos() * d.cos() * t.cos() * p.sin()
                + d.sin() * a.sin() * t.cos()
                + d.cos() * p.cos() * t.sin(),
            p.cos() * t.cos() * a.cos() + p.sin() * t.sin(),
        ]
    }))
}

/// Tail radar geometry rotated into an earth frame (x east, y north) by the
/// aircraft heading.
pub fn antenna_to_cartesian_earth_relative(
    ranges: &[f64],
    rotation: &[f64],
    roll: &[f64],
    heading: &[f64],
    tilt: &[f64],
    pitch: &[f64],
) -> DisplayResult<CartesianGrid> {
    let rays = angles(rotation, roll, heading, tilt, pitch, "heading")?;
    Ok(per_gate(ranges, rays.len(), |ray| {
        let RayAngles {
            rotation_roll: a,
            tilt: t,
            pitch: p,
            yaw: h,
        } = rays[ray];
        [
            -a.cos() * h.sin() * t.cos() * p.sin()
                + h.cos() * a.sin() * t.cos()
                + h.sin() * p.cos() * t.sin(),
            -a.cos() * h.cos() * t.cos() * p.sin() - h.sin() * a.sin() * t.cos()
                + h.cos() * p.cos() * t.sin(),
            p.cos() * t.cos() * a.cos() + p.sin() * t.sin(),
        ]
    }))
}
