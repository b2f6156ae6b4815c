//! # Waveguide Core
//!
//! Analytical model of a rectangular metal waveguide operating in the
//! dominant H10 (TE10) mode. Given the broad- and narrow-wall dimensions, the
//! permittivity of the filling and the excitation frequency, the model
//! derives cutoff, guided wavelength and phase velocity, and evaluates the
//! instantaneous E and H fields for a matched (travelling-wave) or shorted
//! (standing-wave) guide.
//!
//! ## Architecture
//!
//! [`WaveguideModel`] owns a clamped [`WaveguideConfig`] and the
//! [`DerivedState`] computed from it. Every mutation recomputes the whole
//! snapshot and notifies registered observers before returning. Field
//! evaluation goes through a [`FieldEvaluator`] built from the snapshot.
//!
//! Units at the API boundary are millimetres and gigahertz; field points are
//! in metres and times in seconds.
//!
//! ## Modules
//!
//! - [`types`] — Config, derived snapshot, termination mode.
//! - [`params`] — Accepted ranges and clamping.
//! - [`derived`] — Cutoff, guided wavelength, phase velocity.
//! - [`fields`] — Closed-form TE10 field evaluation (instantaneous and phasor).
//! - [`notify`] — Ordered observer list.
//! - [`model`] — The parameter store tying it together.
//! - [`sampling`] — Probe readings, axial profiles, x–z field maps.
//! - [`constants`] — Physical constants and unit factors.

pub mod constants;
pub mod derived;
pub mod fields;
pub mod model;
pub mod notify;
pub mod params;
pub mod sampling;
pub mod types;

pub use fields::{FieldEvaluator, FieldVector};
pub use model::WaveguideModel;
pub use notify::ObserverId;
pub use sampling::{FieldMap, FieldPlane, FieldProfile, ProbeReading, ProfileLine, SamplingError};
pub use types::{DerivedState, ParseModeError, TerminationMode, WaveguideConfig};
