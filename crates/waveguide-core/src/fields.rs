//! Closed-form TE10 field evaluation.
//!
//! With $a$ the broad-wall width, $\beta = 2\pi / \lambda_g$,
//! $E_0 = \sqrt{P Z_0}$ and $H_0 = E_0 / Z_0$, a single forward wave is
//!
//! $$
//! E_y = E_0 \sin\frac{\pi x}{a} \sin(\omega t - \beta z), \quad
//! H_x = -H_0 \frac{\lambda_g}{2a} \sin\frac{\pi x}{a} \sin(\omega t - \beta z), \quad
//! H_z = H_0 \cos\frac{\pi x}{a} \cos(\omega t - \beta z)
//! $$
//!
//! and the shorted guide, with $z' = z - z_p$ measured from the piston, is
//!
//! $$
//! E_y = 2E_0 \sin\frac{\pi x}{a} \sin\beta z' \cos\omega t, \quad
//! H_x = -2H_0 \frac{\lambda_g}{2a} \sin\frac{\pi x}{a} \cos\beta z' \sin\omega t, \quad
//! H_z = 2H_0 \cos\frac{\pi x}{a} \sin\beta z' \sin\omega t
//! $$
//!
//! Points are `[x, y, z]` in metres in the guide's local frame: x runs across
//! the broad wall from the side wall at `x = 0`, z along the axis. Below
//! cutoff every field is exactly zero; evanescent decay is not modelled.
//!
//! The phasor forms satisfy $F(t) = \operatorname{Im}\{\tilde F e^{i\omega t}\}$.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::constants::VACUUM_IMPEDANCE;
use crate::types::{DerivedState, TerminationMode};

/// A field vector `[x, y, z]`.
pub type FieldVector = [f64; 3];

/// Precomputed evaluation context for one config snapshot.
///
/// Cheap to build and `Copy`; batch evaluations (profiles, maps) reuse one
/// instance so ω, β and the amplitudes are computed once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldEvaluator {
    mode: TerminationMode,
    propagating: bool,
    width_m: f64,
    piston_offset_m: f64,
    guided_wavelength_m: f64,
    omega: f64,
    beta: f64,
    e0: f64,
    h0: f64,
}

impl FieldEvaluator {
    /// Build an evaluator from a derived snapshot plus the settings the
    /// snapshot does not carry (mode and source power).
    pub fn new(derived: &DerivedState, mode: TerminationMode, source_power: f64) -> Self {
        let propagating = derived.has_guided_wave();
        let e0 = (source_power * VACUUM_IMPEDANCE).sqrt();
        let beta = if propagating {
            2.0 * PI / derived.guided_wavelength_m
        } else {
            0.0
        };
        Self {
            mode,
            propagating,
            width_m: derived.width_m,
            piston_offset_m: derived.piston_offset_m,
            guided_wavelength_m: derived.guided_wavelength_m,
            omega: 2.0 * PI * derived.frequency_hz,
            beta,
            e0,
            h0: e0 / VACUUM_IMPEDANCE,
        }
    }

    pub fn mode(&self) -> TerminationMode {
        self.mode
    }

    pub fn is_propagating(&self) -> bool {
        self.propagating
    }

    /// Angular frequency ω (rad/s).
    pub fn angular_frequency(&self) -> f64 {
        self.omega
    }

    /// Phase constant β (rad/m); zero below cutoff.
    pub fn phase_constant(&self) -> f64 {
        self.beta
    }

    /// Electric field amplitude E₀ (V/m).
    pub fn e0(&self) -> f64 {
        self.e0
    }

    /// Magnetic field amplitude H₀ (A/m).
    pub fn h0(&self) -> f64 {
        self.h0
    }

    /// Instantaneous electric field at `point` and `time` (s).
    pub fn electric_at(&self, point: &[f64; 3], time: f64) -> FieldVector {
        if !self.propagating {
            return [0.0; 3];
        }
        let sx = self.transverse_sin(point[0]);
        let wt = self.omega * time;

        let ey = match self.mode {
            TerminationMode::Traveling => self.e0 * sx * (wt - self.beta * point[2]).sin(),
            TerminationMode::Standing => {
                let bz = self.beta * self.from_piston(point[2]);
                2.0 * self.e0 * sx * bz.sin() * wt.cos()
            }
        };
        [0.0, ey, 0.0]
    }

    /// Instantaneous magnetic field at `point` and `time` (s).
    pub fn magnetic_at(&self, point: &[f64; 3], time: f64) -> FieldVector {
        if !self.propagating {
            return [0.0; 3];
        }
        let sx = self.transverse_sin(point[0]);
        let cx = self.transverse_cos(point[0]);
        let k = self.transverse_ratio();
        let wt = self.omega * time;

        match self.mode {
            TerminationMode::Traveling => {
                let phase = wt - self.beta * point[2];
                [
                    -self.h0 * k * sx * phase.sin(),
                    0.0,
                    self.h0 * cx * phase.cos(),
                ]
            }
            TerminationMode::Standing => {
                let bz = self.beta * self.from_piston(point[2]);
                [
                    -2.0 * self.h0 * k * sx * bz.cos() * wt.sin(),
                    0.0,
                    2.0 * self.h0 * cx * bz.sin() * wt.sin(),
                ]
            }
        }
    }

    /// Complex electric field amplitude at `point`.
    pub fn electric_phasor(&self, point: &[f64; 3]) -> [Complex64; 3] {
        let zero = Complex64::new(0.0, 0.0);
        if !self.propagating {
            return [zero; 3];
        }
        let sx = self.transverse_sin(point[0]);

        let ey = match self.mode {
            // sin(ωt - βz) = Im{e^{-iβz} e^{iωt}}
            TerminationMode::Traveling => self.e0 * sx * Complex64::new(0.0, -self.beta * point[2]).exp(),
            // cos(ωt) = Im{i e^{iωt}}
            TerminationMode::Standing => {
                let bz = self.beta * self.from_piston(point[2]);
                Complex64::new(0.0, 2.0 * self.e0 * sx * bz.sin())
            }
        };
        [zero, ey, zero]
    }

    /// Complex magnetic field amplitude at `point`.
    pub fn magnetic_phasor(&self, point: &[f64; 3]) -> [Complex64; 3] {
        let zero = Complex64::new(0.0, 0.0);
        if !self.propagating {
            return [zero; 3];
        }
        let sx = self.transverse_sin(point[0]);
        let cx = self.transverse_cos(point[0]);
        let k = self.transverse_ratio();

        match self.mode {
            TerminationMode::Traveling => {
                let travel = Complex64::new(0.0, -self.beta * point[2]).exp();
                [
                    -self.h0 * k * sx * travel,
                    zero,
                    Complex64::i() * self.h0 * cx * travel,
                ]
            }
            TerminationMode::Standing => {
                let bz = self.beta * self.from_piston(point[2]);
                [
                    Complex64::from(-2.0 * self.h0 * k * sx * bz.cos()),
                    zero,
                    Complex64::from(2.0 * self.h0 * cx * bz.sin()),
                ]
            }
        }
    }

    fn transverse_sin(&self, x: f64) -> f64 {
        (PI * x / self.width_m).sin()
    }

    fn transverse_cos(&self, x: f64) -> f64 {
        (PI * x / self.width_m).cos()
    }

    /// λg / 2a
    fn transverse_ratio(&self) -> f64 {
        self.guided_wavelength_m / (2.0 * self.width_m)
    }

    fn from_piston(&self, z: f64) -> f64 {
        z - self.piston_offset_m
    }
}

/// Euclidean length of a field vector.
pub fn magnitude(v: &FieldVector) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// Instantaneous value of a phasor vector at time `time`.
pub fn phasor_at(phasor: &[Complex64; 3], omega: f64, time: f64) -> FieldVector {
    let rot = Complex64::new(0.0, omega * time).exp();
    [
        (phasor[0] * rot).im,
        (phasor[1] * rot).im,
        (phasor[2] * rot).im,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WaveguideConfig;
    use approx::assert_abs_diff_eq;

    fn evaluator(mode: TerminationMode, f_ghz: f64, piston_mm: f64) -> FieldEvaluator {
        let config = WaveguideConfig {
            frequency_ghz: f_ghz,
            piston_offset_mm: piston_mm,
            termination_mode: mode,
            ..Default::default()
        };
        let derived = DerivedState::from_config(&config);
        FieldEvaluator::new(&derived, mode, config.source_power)
    }

    #[test]
    fn test_amplitudes_follow_source_power() {
        let ev = evaluator(TerminationMode::Traveling, 9.0, 0.0);
        assert_abs_diff_eq!(ev.e0(), VACUUM_IMPEDANCE.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(ev.h0() * VACUUM_IMPEDANCE, ev.e0(), epsilon = 1e-12);
    }

    #[test]
    fn test_traveling_peak_at_guide_centre() {
        let ev = evaluator(TerminationMode::Traveling, 9.0, 0.0);
        let omega = ev.angular_frequency();
        // ωt = π/2 at z = 0 puts E_y at its crest
        let t = 0.5 * PI / omega;
        let e = ev.electric_at(&[0.0115, 0.0, 0.0], t);
        assert_abs_diff_eq!(e[1], ev.e0(), epsilon = 1e-9);
        assert_eq!(e[0], 0.0);
        assert_eq!(e[2], 0.0);
    }

    #[test]
    fn test_traveling_h_components() {
        let ev = evaluator(TerminationMode::Traveling, 9.0, 0.0);
        let h = ev.magnetic_at(&[0.0, 0.005, 0.0], 0.0);
        // At x = 0: sin term vanishes, cos term is 1, phase is 0.
        assert_abs_diff_eq!(h[0], 0.0, epsilon = 1e-15);
        assert_eq!(h[1], 0.0);
        assert_abs_diff_eq!(h[2], ev.h0(), epsilon = 1e-12);
    }

    #[test]
    fn test_traveling_wave_repeats_after_one_guided_wavelength() {
        let ev = evaluator(TerminationMode::Traveling, 9.0, 0.0);
        let lambda_g = 2.0 * PI / ev.phase_constant();
        let p = [0.007, 0.0, 0.012];
        let q = [0.007, 0.0, 0.012 + lambda_g];
        let e1 = ev.electric_at(&p, 3.1e-11);
        let e2 = ev.electric_at(&q, 3.1e-11);
        assert_abs_diff_eq!(e1[1], e2[1], epsilon = 1e-9);
    }

    #[test]
    fn test_standing_wave_doubles_amplitude() {
        let ev = evaluator(TerminationMode::Standing, 9.0, 0.0);
        let quarter = 0.25 * 2.0 * PI / ev.phase_constant();
        // βz' = π/2, cos ωt = 1
        let e = ev.electric_at(&[0.0115, 0.0, quarter], 0.0);
        assert_abs_diff_eq!(e[1], 2.0 * ev.e0(), epsilon = 1e-9);
    }

    #[test]
    fn test_phasor_matches_instantaneous_field() {
        for mode in [TerminationMode::Traveling, TerminationMode::Standing] {
            let ev = evaluator(mode, 12.0, 40.0);
            let omega = ev.angular_frequency();
            for &(x, z) in &[(0.003, 0.0), (0.0115, 0.021), (0.02, 0.137)] {
                for &t in &[0.0, 1.3e-11, 7.7e-11] {
                    let p = [x, 0.004, z];
                    let e = phasor_at(&ev.electric_phasor(&p), omega, t);
                    let h = phasor_at(&ev.magnetic_phasor(&p), omega, t);
                    let e_direct = ev.electric_at(&p, t);
                    let h_direct = ev.magnetic_at(&p, t);
                    for i in 0..3 {
                        assert_abs_diff_eq!(e[i], e_direct[i], epsilon = 1e-9);
                        assert_abs_diff_eq!(h[i], h_direct[i], epsilon = 1e-11);
                    }
                }
            }
        }
    }

    #[test]
    fn test_below_cutoff_phasors_are_zero() {
        let ev = evaluator(TerminationMode::Traveling, 5.0, 0.0);
        assert!(!ev.is_propagating());
        let p = [0.01, 0.0, 0.1];
        assert!(ev.electric_phasor(&p).iter().all(|c| c.norm() == 0.0));
        assert!(ev.magnetic_phasor(&p).iter().all(|c| c.norm() == 0.0));
    }

    #[test]
    fn test_magnitude() {
        assert_eq!(magnitude(&[3.0, 4.0, 0.0]), 5.0);
        assert_eq!(magnitude(&[0.0; 3]), 0.0);
    }
}
