//! Probe readings, axial field profiles and x–z field maps.
//!
//! These are batch reads over a [`FieldEvaluator`]: they never touch the
//! model's state and can be taken at any time against the latest snapshot.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fields::{magnitude, FieldEvaluator, FieldVector};

/// Errors from malformed sampling requests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingError {
    #[error("Axis '{axis}' needs at least 2 samples, got {requested}")]
    TooFewSamples { axis: &'static str, requested: usize },

    #[error("Axis '{axis}' has an invalid range [{start}, {end}]")]
    InvalidRange { axis: &'static str, start: f64, end: f64 },

    #[error("Sample time {0} is not finite")]
    InvalidTime(f64),
}

/// Field values at a single point, as read by a movable probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeReading {
    /// Probe position (m).
    pub position: [f64; 3],
    /// Sample time (s).
    pub time: f64,
    pub electric: FieldVector,
    pub magnetic: FieldVector,
    /// |E| (V/m).
    pub electric_magnitude: f64,
    /// |H| (A/m).
    pub magnetic_magnitude: f64,
}

/// Read the field at `position` and `time`.
pub fn probe(evaluator: &FieldEvaluator, position: &[f64; 3], time: f64) -> ProbeReading {
    let electric = evaluator.electric_at(position, time);
    let magnetic = evaluator.magnetic_at(position, time);
    ProbeReading {
        position: *position,
        time,
        electric,
        magnetic,
        electric_magnitude: magnitude(&electric),
        magnetic_magnitude: magnitude(&magnetic),
    }
}

/// A line parallel to the guide axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileLine {
    /// Transverse position across the broad wall (m).
    pub x: f64,
    /// Height above the bottom wall (m). TE10 fields do not depend on it.
    pub y: f64,
    /// First sample along z (m).
    pub z_start: f64,
    /// Last sample along z (m), included.
    pub z_end: f64,
    /// Number of samples, at least 2.
    pub samples: usize,
}

impl ProfileLine {
    /// 100 samples along the guide centre line over `length_m`.
    pub fn centre_line(width_m: f64, length_m: f64) -> Self {
        Self {
            x: 0.5 * width_m,
            y: 0.0,
            z_start: 0.0,
            z_end: length_m,
            samples: 100,
        }
    }
}

/// Instantaneous fields sampled along a [`ProfileLine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldProfile {
    pub time: f64,
    /// Sample positions along z (m).
    pub z: Vec<f64>,
    pub electric: Vec<FieldVector>,
    pub magnetic: Vec<FieldVector>,
}

impl FieldProfile {
    pub fn len(&self) -> usize {
        self.z.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }

    /// Largest |E| along the profile.
    pub fn peak_electric(&self) -> f64 {
        self.electric.iter().map(magnitude).fold(0.0, f64::max)
    }
}

/// Sample the fields along `line` at `time`.
pub fn sample_profile(
    evaluator: &FieldEvaluator,
    line: &ProfileLine,
    time: f64,
) -> Result<FieldProfile, SamplingError> {
    check_time(time)?;
    let z = linspace("z", line.z_start, line.z_end, line.samples)?;

    let mut electric = Vec::with_capacity(z.len());
    let mut magnetic = Vec::with_capacity(z.len());
    for &zi in &z {
        let p = [line.x, line.y, zi];
        electric.push(evaluator.electric_at(&p, time));
        magnetic.push(evaluator.magnetic_at(&p, time));
    }

    Ok(FieldProfile { time, z, electric, magnetic })
}

/// A rectangular grid on the x–z plane at fixed height `y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldPlane {
    pub y: f64,
    /// `[x_min, x_max]` (m).
    pub x_range: [f64; 2],
    /// `[z_min, z_max]` (m).
    pub z_range: [f64; 2],
    pub nx: usize,
    pub nz: usize,
}

impl FieldPlane {
    /// The full broad-wall cross-section over `length_m` of guide.
    pub fn broad_wall(width_m: f64, length_m: f64, nx: usize, nz: usize) -> Self {
        Self {
            y: 0.0,
            x_range: [0.0, width_m],
            z_range: [0.0, length_m],
            nx,
            nz,
        }
    }
}

/// Instantaneous |E|² and |H|² on a [`FieldPlane`].
///
/// Intensity arrays have shape `(nz, nx)`; `positions` is row-major in the
/// same order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMap {
    pub time: f64,
    pub positions: Vec<[f64; 3]>,
    pub electric_intensity: Array2<f64>,
    pub magnetic_intensity: Array2<f64>,
    pub nx: usize,
    pub nz: usize,
    /// `[x_min, x_max, z_min, z_max]` (m).
    pub extent: [f64; 4],
}

/// Sample |E|² and |H|² over `plane` at `time`.
pub fn sample_plane(
    evaluator: &FieldEvaluator,
    plane: &FieldPlane,
    time: f64,
) -> Result<FieldMap, SamplingError> {
    check_time(time)?;
    let xs = linspace("x", plane.x_range[0], plane.x_range[1], plane.nx)?;
    let zs = linspace("z", plane.z_range[0], plane.z_range[1], plane.nz)?;

    let mut positions = Vec::with_capacity(plane.nx * plane.nz);
    let mut electric_intensity = Array2::zeros((plane.nz, plane.nx));
    let mut magnetic_intensity = Array2::zeros((plane.nz, plane.nx));

    for (iz, &z) in zs.iter().enumerate() {
        for (ix, &x) in xs.iter().enumerate() {
            let p = [x, plane.y, z];
            let e = evaluator.electric_at(&p, time);
            let h = evaluator.magnetic_at(&p, time);
            electric_intensity[[iz, ix]] = e[0] * e[0] + e[1] * e[1] + e[2] * e[2];
            magnetic_intensity[[iz, ix]] = h[0] * h[0] + h[1] * h[1] + h[2] * h[2];
            positions.push(p);
        }
    }

    Ok(FieldMap {
        time,
        positions,
        electric_intensity,
        magnetic_intensity,
        nx: plane.nx,
        nz: plane.nz,
        extent: [
            plane.x_range[0],
            plane.x_range[1],
            plane.z_range[0],
            plane.z_range[1],
        ],
    })
}

fn check_time(time: f64) -> Result<(), SamplingError> {
    if time.is_finite() {
        Ok(())
    } else {
        Err(SamplingError::InvalidTime(time))
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive.
fn linspace(axis: &'static str, start: f64, end: f64, n: usize) -> Result<Vec<f64>, SamplingError> {
    if n < 2 {
        return Err(SamplingError::TooFewSamples { axis, requested: n });
    }
    if !start.is_finite() || !end.is_finite() || start == end {
        return Err(SamplingError::InvalidRange { axis, start, end });
    }
    let step = (end - start) / (n - 1) as f64;
    Ok((0..n)
        .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
        .collect())
}
