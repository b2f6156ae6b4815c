//! Derived-quantity calculator for the TE10 mode.
//!
//! For a guide of broad-wall width $a$ filled with a dielectric of relative
//! permittivity $\epsilon_r$:
//!
//! $$
//! \lambda_c = 2a, \qquad f_c = \frac{c}{\lambda_c \sqrt{\epsilon_r}}, \qquad
//! \lambda_g = \frac{\lambda}{\sqrt{1 - (\lambda / \lambda_c)^2}}
//! $$
//!
//! where $\lambda = \lambda_0 / \sqrt{\epsilon_r}$ is the wavelength in the
//! filling. The transform is pure: the same config always yields the same
//! snapshot.

use crate::constants::{GHZ_TO_HZ, MM_TO_M, SPEED_OF_LIGHT, WALL_CLEARANCE_M};
use crate::types::{DerivedState, WaveguideConfig};

impl DerivedState {
    /// Compute the snapshot for `config`.
    ///
    /// `config` is expected to be clamped already (positive width, εᵣ ≥ 1,
    /// positive frequency), which the model guarantees.
    pub fn from_config(config: &WaveguideConfig) -> Self {
        let height_m = config.height_mm * MM_TO_M;
        let width_m = effective_width_m(config.width_mm * MM_TO_M, height_m);

        let eps = config.permittivity;
        let sqrt_eps = eps.sqrt();
        let frequency_hz = config.frequency_ghz * GHZ_TO_HZ;

        let free_space_wavelength_m = SPEED_OF_LIGHT / frequency_hz;
        let medium_wavelength_m = free_space_wavelength_m / sqrt_eps;

        let cutoff_wavelength_m = 2.0 * width_m;
        let cutoff_frequency_hz = SPEED_OF_LIGHT / (cutoff_wavelength_m * sqrt_eps);

        let is_propagating = propagates(frequency_hz, cutoff_frequency_hz);

        let (guided_wavelength_m, phase_velocity_m_s) = if is_propagating {
            match dispersion_factor(medium_wavelength_m, cutoff_wavelength_m) {
                Some(root) => (
                    medium_wavelength_m / root,
                    SPEED_OF_LIGHT / (sqrt_eps * root),
                ),
                None => (0.0, 0.0),
            }
        } else {
            (0.0, 0.0)
        };

        Self {
            width_m,
            height_m,
            relative_permittivity: eps,
            frequency_hz,
            piston_offset_m: config.piston_offset_mm * MM_TO_M,
            free_space_wavelength_m,
            medium_wavelength_m,
            cutoff_wavelength_m,
            cutoff_frequency_hz,
            is_propagating,
            guided_wavelength_m,
            phase_velocity_m_s,
        }
    }

    /// Whether the field evaluator has a real guided wavelength to work with.
    pub fn has_guided_wave(&self) -> bool {
        self.is_propagating && self.guided_wavelength_m > 0.0
    }
}

/// Width actually used for the calculation: `height + 1 mm` whenever the
/// requested width does not exceed the height.
pub fn effective_width_m(width_m: f64, height_m: f64) -> f64 {
    if width_m <= height_m {
        height_m + WALL_CLEARANCE_M
    } else {
        width_m
    }
}

/// Propagation condition. At exactly the cutoff frequency the mode is treated
/// as evanescent.
pub fn propagates(frequency_hz: f64, cutoff_frequency_hz: f64) -> bool {
    frequency_hz > cutoff_frequency_hz
}

/// $\sqrt{1 - (\lambda / \lambda_c)^2}$, or `None` when $\lambda \ge \lambda_c$.
fn dispersion_factor(medium_wavelength_m: f64, cutoff_wavelength_m: f64) -> Option<f64> {
    let ratio = medium_wavelength_m / cutoff_wavelength_m;
    if !(0.0..1.0).contains(&ratio) {
        return None;
    }
    let root = (1.0 - ratio * ratio).sqrt();
    (root > 0.0).then_some(root)
}
