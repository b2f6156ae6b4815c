//! Core types shared across the waveguide model.
//!
//! [`WaveguideConfig`] holds the user-facing inputs exactly as they were last
//! stored (after clamping). [`DerivedState`] is the SI snapshot computed from
//! it; see [`crate::derived`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the far end of the guide is terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationMode {
    /// Matched load: a single forward-travelling TE10 wave.
    #[serde(alias = "travelling")]
    Traveling,
    /// Shorting piston: forward and reflected waves form a standing pattern.
    Standing,
}

impl fmt::Display for TerminationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Traveling => f.write_str("traveling"),
            Self::Standing => f.write_str("standing"),
        }
    }
}

/// Returned when a termination mode name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown termination mode '{0}'. Valid modes: traveling, standing")]
pub struct ParseModeError(pub String);

impl FromStr for TerminationMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "traveling" | "travelling" => Ok(Self::Traveling),
            "standing" => Ok(Self::Standing),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// User-facing waveguide parameters.
///
/// Values are in the units the presentation layer works with. A config built
/// by hand may hold anything; the model clamps every field before storing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveguideConfig {
    /// Broad-wall width `a` (mm).
    pub width_mm: f64,
    /// Narrow-wall height `b` (mm).
    pub height_mm: f64,
    /// Relative permittivity εᵣ of the dielectric filling.
    pub permittivity: f64,
    /// Excitation frequency (GHz).
    pub frequency_ghz: f64,
    /// Shorting piston position along z (mm). Only used in standing mode.
    pub piston_offset_mm: f64,
    /// Source power feeding the field amplitude.
    pub source_power: f64,
    pub termination_mode: TerminationMode,
}

impl Default for WaveguideConfig {
    fn default() -> Self {
        // WR-90-like X-band guide, air-filled, driven at 9 GHz.
        Self {
            width_mm: 23.0,
            height_mm: 10.0,
            permittivity: 1.0,
            frequency_ghz: 9.0,
            piston_offset_mm: 0.0,
            source_power: 1.0,
            termination_mode: TerminationMode::Standing,
        }
    }
}

/// Quantities derived from a [`WaveguideConfig`], all in SI units.
///
/// Never edited in place: every config change replaces the whole snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedState {
    /// Effective broad-wall width (m), after the `width > height` repair.
    pub width_m: f64,
    /// Narrow-wall height (m).
    pub height_m: f64,
    pub relative_permittivity: f64,
    pub frequency_hz: f64,
    pub piston_offset_m: f64,
    /// λ₀ = c / f (m).
    pub free_space_wavelength_m: f64,
    /// λ = λ₀ / √εᵣ (m).
    pub medium_wavelength_m: f64,
    /// λc = 2a (m).
    pub cutoff_wavelength_m: f64,
    /// fc = c / (λc √εᵣ) (Hz).
    pub cutoff_frequency_hz: f64,
    /// `frequency_hz > cutoff_frequency_hz`, strictly.
    pub is_propagating: bool,
    /// λg (m); zero below cutoff.
    pub guided_wavelength_m: f64,
    /// vₚ (m/s); zero below cutoff.
    pub phase_velocity_m_s: f64,
}
