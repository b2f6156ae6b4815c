//! The waveguide model: parameter store, recomputation and notification.
//!
//! Every mutator follows the same path: clamp → store → recompute the
//! [`DerivedState`] snapshot → notify observers. Accessors read the latest
//! snapshot and have no side effects.
//!
//! ```
//! use waveguide_core::{TerminationMode, WaveguideModel};
//!
//! let mut model = WaveguideModel::default();
//! model.set_width(23.0);
//! model.set_frequency(9.0);
//! model.set_termination_mode(TerminationMode::Traveling);
//!
//! assert!(model.is_propagating());
//! assert!((model.cutoff_frequency_ghz() - 6.517).abs() < 1e-3);
//!
//! let e = model.evaluate_electric_field(&[0.0115, 0.0, 0.0], 0.0);
//! assert_eq!(e[0], 0.0);
//! ```

use crate::constants::{HZ_TO_GHZ, M_TO_MM};
use crate::fields::{FieldEvaluator, FieldVector};
use crate::notify::{ChangeNotifier, ObserverId};
use crate::params;
use crate::sampling::{self, FieldMap, FieldPlane, FieldProfile, ProbeReading, ProfileLine, SamplingError};
use crate::types::{DerivedState, TerminationMode, WaveguideConfig};

/// H10 rectangular waveguide.
#[derive(Debug)]
pub struct WaveguideModel {
    config: WaveguideConfig,
    derived: DerivedState,
    notifier: ChangeNotifier,
}

impl Default for WaveguideModel {
    fn default() -> Self {
        Self::from_config(WaveguideConfig::default())
    }
}

impl WaveguideModel {
    /// Build a model from `config`, clamping every field into its range.
    pub fn from_config(config: WaveguideConfig) -> Self {
        let config = WaveguideConfig {
            width_mm: params::WIDTH_MM.clamp_logged(config.width_mm),
            height_mm: params::HEIGHT_MM.clamp_logged(config.height_mm),
            permittivity: params::PERMITTIVITY.clamp_logged(config.permittivity),
            frequency_ghz: params::FREQUENCY_GHZ.clamp_logged(config.frequency_ghz),
            piston_offset_mm: params::PISTON_OFFSET_MM.clamp_logged(config.piston_offset_mm),
            source_power: params::SOURCE_POWER.clamp_logged(config.source_power),
            termination_mode: config.termination_mode,
        };
        let derived = DerivedState::from_config(&config);
        log::info!(
            "waveguide {}x{} mm, eps={}, f={} GHz, fc={:.3} GHz",
            config.width_mm,
            config.height_mm,
            config.permittivity,
            config.frequency_ghz,
            derived.cutoff_frequency_hz * HZ_TO_GHZ
        );
        Self {
            config,
            derived,
            notifier: ChangeNotifier::new(),
        }
    }

    // ── Mutators ────────────────────────────────────────────────────────

    /// Set the broad-wall width (mm), clamped to [10, 100]. Returns the
    /// stored value.
    ///
    /// The effective width used in calculations may be larger if the new
    /// width does not exceed the height; see [`width_mm`](Self::width_mm).
    pub fn set_width(&mut self, width_mm: f64) -> f64 {
        self.config.width_mm = params::WIDTH_MM.clamp_logged(width_mm);
        self.recalculate();
        log::debug!("width set to {} mm", self.config.width_mm);
        self.config.width_mm
    }

    /// Set the narrow-wall height (mm), clamped to [5, 50].
    pub fn set_height(&mut self, height_mm: f64) -> f64 {
        self.config.height_mm = params::HEIGHT_MM.clamp_logged(height_mm);
        self.recalculate();
        log::debug!("height set to {} mm", self.config.height_mm);
        self.config.height_mm
    }

    /// Set the relative permittivity, clamped to [1, 10].
    pub fn set_permittivity(&mut self, permittivity: f64) -> f64 {
        self.config.permittivity = params::PERMITTIVITY.clamp_logged(permittivity);
        self.recalculate();
        log::debug!("permittivity set to {}", self.config.permittivity);
        self.config.permittivity
    }

    /// Set the excitation frequency (GHz), clamped to [1, 20].
    pub fn set_frequency(&mut self, frequency_ghz: f64) -> f64 {
        self.config.frequency_ghz = params::FREQUENCY_GHZ.clamp_logged(frequency_ghz);
        self.recalculate();
        log::debug!("frequency set to {} GHz", self.config.frequency_ghz);
        self.config.frequency_ghz
    }

    /// Set the shorting piston position (mm), clamped to [0, 300].
    pub fn set_piston_offset(&mut self, offset_mm: f64) -> f64 {
        self.config.piston_offset_mm = params::PISTON_OFFSET_MM.clamp_logged(offset_mm);
        self.recalculate();
        log::debug!("piston set to {} mm", self.config.piston_offset_mm);
        self.config.piston_offset_mm
    }

    /// Set the source power, clamped to [0.1, 10].
    pub fn set_source_power(&mut self, power: f64) -> f64 {
        self.config.source_power = params::SOURCE_POWER.clamp_logged(power);
        self.recalculate();
        log::debug!("source power set to {}", self.config.source_power);
        self.config.source_power
    }

    pub fn set_termination_mode(&mut self, mode: TerminationMode) {
        self.config.termination_mode = mode;
        self.recalculate();
        log::debug!("termination mode set to {}", mode);
    }

    /// Set width then height. Observers are notified after each step.
    pub fn set_waveguide_size(&mut self, width_mm: f64, height_mm: f64) {
        self.set_width(width_mm);
        self.set_height(height_mm);
    }

    fn recalculate(&mut self) {
        self.derived = DerivedState::from_config(&self.config);
        self.notifier.notify();
    }

    // ── Observers ───────────────────────────────────────────────────────

    /// Register a callback run after every recomputation.
    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut() + 'static,
    {
        self.notifier.subscribe(observer)
    }

    /// Deregister a callback. Unknown ids are ignored (returns `false`).
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.notifier.unsubscribe(id)
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &WaveguideConfig {
        &self.config
    }

    pub fn derived(&self) -> &DerivedState {
        &self.derived
    }

    /// Effective broad-wall width (mm), after the `width > height` repair.
    pub fn width_mm(&self) -> f64 {
        self.derived.width_m * M_TO_MM
    }

    pub fn height_mm(&self) -> f64 {
        self.config.height_mm
    }

    /// Effective broad-wall width `a` (m).
    pub fn width_m(&self) -> f64 {
        self.derived.width_m
    }

    /// Narrow-wall height `b` (m).
    pub fn height_m(&self) -> f64 {
        self.derived.height_m
    }

    pub fn permittivity(&self) -> f64 {
        self.config.permittivity
    }

    pub fn frequency_ghz(&self) -> f64 {
        self.config.frequency_ghz
    }

    pub fn piston_offset_mm(&self) -> f64 {
        self.config.piston_offset_mm
    }

    pub fn source_power(&self) -> f64 {
        self.config.source_power
    }

    pub fn termination_mode(&self) -> TerminationMode {
        self.config.termination_mode
    }

    pub fn cutoff_frequency_ghz(&self) -> f64 {
        self.derived.cutoff_frequency_hz * HZ_TO_GHZ
    }

    pub fn cutoff_wavelength_mm(&self) -> f64 {
        self.derived.cutoff_wavelength_m * M_TO_MM
    }

    /// Guided wavelength (mm); zero below cutoff.
    pub fn guided_wavelength_mm(&self) -> f64 {
        self.derived.guided_wavelength_m * M_TO_MM
    }

    pub fn free_space_wavelength_mm(&self) -> f64 {
        self.derived.free_space_wavelength_m * M_TO_MM
    }

    pub fn medium_wavelength_mm(&self) -> f64 {
        self.derived.medium_wavelength_m * M_TO_MM
    }

    pub fn is_propagating(&self) -> bool {
        self.derived.is_propagating
    }

    /// Phase velocity (m/s); zero below cutoff.
    pub fn phase_velocity(&self) -> f64 {
        self.derived.phase_velocity_m_s
    }

    // ── Field evaluation ────────────────────────────────────────────────

    /// Evaluation context for the current snapshot.
    pub fn evaluator(&self) -> FieldEvaluator {
        FieldEvaluator::new(
            &self.derived,
            self.config.termination_mode,
            self.config.source_power,
        )
    }

    /// Electric field (V/m) at `point` (m) and `time` (s).
    pub fn evaluate_electric_field(&self, point: &[f64; 3], time: f64) -> FieldVector {
        self.evaluator().electric_at(point, time)
    }

    /// Magnetic field (A/m) at `point` (m) and `time` (s).
    pub fn evaluate_magnetic_field(&self, point: &[f64; 3], time: f64) -> FieldVector {
        self.evaluator().magnetic_at(point, time)
    }

    pub fn probe(&self, point: &[f64; 3], time: f64) -> ProbeReading {
        sampling::probe(&self.evaluator(), point, time)
    }

    pub fn sample_profile(&self, line: &ProfileLine, time: f64) -> Result<FieldProfile, SamplingError> {
        sampling::sample_profile(&self.evaluator(), line, time)
    }

    pub fn sample_plane(&self, plane: &FieldPlane, time: f64) -> Result<FieldMap, SamplingError> {
        sampling::sample_plane(&self.evaluator(), plane, time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_from_config_clamps_every_field() {
        let model = WaveguideModel::from_config(WaveguideConfig {
            width_mm: 500.0,
            height_mm: 1.0,
            permittivity: 0.5,
            frequency_ghz: 50.0,
            piston_offset_mm: -10.0,
            source_power: 100.0,
            termination_mode: TerminationMode::Traveling,
        });
        let c = model.config();
        assert_eq!(c.width_mm, 100.0);
        assert_eq!(c.height_mm, 5.0);
        assert_eq!(c.permittivity, 1.0);
        assert_eq!(c.frequency_ghz, 20.0);
        assert_eq!(c.piston_offset_mm, 0.0);
        assert_eq!(c.source_power, 10.0);
    }

    #[test]
    fn test_setters_return_stored_value() {
        let mut model = WaveguideModel::default();
        assert_eq!(model.set_width(5.0), 10.0);
        assert_eq!(model.set_height(60.0), 50.0);
        assert_eq!(model.set_permittivity(2.25), 2.25);
        assert_eq!(model.set_frequency(0.1), 1.0);
        assert_eq!(model.set_piston_offset(400.0), 300.0);
        assert_eq!(model.set_source_power(0.01), 0.1);
    }

    #[test]
    fn test_every_mutator_notifies_once() {
        let mut model = WaveguideModel::default();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        model.subscribe(move || c.set(c.get() + 1));

        model.set_width(30.0);
        model.set_height(12.0);
        model.set_permittivity(2.0);
        model.set_frequency(10.0);
        model.set_piston_offset(50.0);
        model.set_source_power(2.0);
        model.set_termination_mode(TerminationMode::Traveling);
        assert_eq!(count.get(), 7);

        model.set_waveguide_size(40.0, 20.0);
        assert_eq!(count.get(), 9);
    }

    #[test]
    fn test_idempotent_set_still_notifies() {
        let mut model = WaveguideModel::default();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        model.subscribe(move || c.set(c.get() + 1));

        model.set_frequency(9.0);
        model.set_frequency(9.0);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_width_accessor_reports_repaired_width() {
        let mut model = WaveguideModel::default();
        model.set_width(20.0);
        model.set_height(30.0);
        assert_abs_diff_eq!(model.width_m(), 0.030 + 0.001, epsilon = 1e-15);
        assert_abs_diff_eq!(model.width_mm(), 31.0, epsilon = 1e-9);
        // the request is kept, so lowering the height restores it
        assert_eq!(model.config().width_mm, 20.0);
        model.set_height(10.0);
        assert_abs_diff_eq!(model.width_mm(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mode_change_takes_effect_on_next_evaluation() {
        let mut model = WaveguideModel::default();
        model.set_piston_offset(0.0);
        model.set_termination_mode(TerminationMode::Standing);
        let p = [0.0115, 0.0, 0.0];
        // standing wave has a node at the piston
        assert_abs_diff_eq!(model.evaluate_electric_field(&p, 0.0)[1], 0.0, epsilon = 1e-12);

        model.set_termination_mode(TerminationMode::Traveling);
        let t = 0.25 / (model.frequency_ghz() * 1e9);
        assert!(model.evaluate_electric_field(&p, t)[1] > 0.0);
    }
}
