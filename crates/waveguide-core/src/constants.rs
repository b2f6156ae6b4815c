//! Physical constants and unit conversion factors.
//!
//! The public API of the model speaks millimetres and gigahertz; everything
//! behind it is SI. The factors below are the only place the two meet.

/// Speed of light in vacuum _c_ (m/s). Exact by SI definition.
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Characteristic impedance of free space Z₀ (Ω).
///
/// Used only as an amplitude normalisation for the field evaluator:
/// $E_0 = \sqrt{P Z_0}$, $H_0 = E_0 / Z_0$.
pub const VACUUM_IMPEDANCE: f64 = 376.73;

/// Millimetres → metres.
pub const MM_TO_M: f64 = 1e-3;

/// Metres → millimetres.
pub const M_TO_MM: f64 = 1e3;

/// Gigahertz → hertz.
pub const GHZ_TO_HZ: f64 = 1e9;

/// Hertz → gigahertz.
pub const HZ_TO_GHZ: f64 = 1e-9;

/// Minimum clearance between the broad and narrow walls (m).
///
/// When an update leaves `width <= height`, the effective width becomes
/// `height + WALL_CLEARANCE_M`.
pub const WALL_CLEARANCE_M: f64 = 1e-3;
