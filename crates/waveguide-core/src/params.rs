//! Accepted ranges for every user-facing parameter.
//!
//! The model never rejects a value. Each setter passes its argument through
//! [`ParamRange::clamp`] and stores whatever comes out, so an out-of-range
//! request is a lossy correction rather than a failure.

/// A closed interval `[min, max]` in user-facing units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    /// Parameter name, used in log messages and range listings.
    pub name: &'static str,
    /// Unit label for display ("mm", "GHz", or empty).
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
}

/// Broad-wall width `a` (mm).
pub const WIDTH_MM: ParamRange = ParamRange { name: "width", unit: "mm", min: 10.0, max: 100.0 };

/// Narrow-wall height `b` (mm).
pub const HEIGHT_MM: ParamRange = ParamRange { name: "height", unit: "mm", min: 5.0, max: 50.0 };

/// Relative permittivity εᵣ of the filling.
pub const PERMITTIVITY: ParamRange = ParamRange { name: "permittivity", unit: "", min: 1.0, max: 10.0 };

/// Excitation frequency (GHz).
pub const FREQUENCY_GHZ: ParamRange = ParamRange { name: "frequency", unit: "GHz", min: 1.0, max: 20.0 };

/// Shorting piston position along the guide axis (mm).
pub const PISTON_OFFSET_MM: ParamRange = ParamRange { name: "piston_offset", unit: "mm", min: 0.0, max: 300.0 };

/// Source power used for amplitude normalisation.
pub const SOURCE_POWER: ParamRange = ParamRange { name: "source_power", unit: "", min: 0.1, max: 10.0 };

/// All ranges, in the order the lab bench lists them.
pub const ALL: [ParamRange; 6] = [
    WIDTH_MM,
    HEIGHT_MM,
    PERMITTIVITY,
    FREQUENCY_GHZ,
    PISTON_OFFSET_MM,
    SOURCE_POWER,
];

impl ParamRange {
    /// Clamp `value` into `[min, max]`.
    ///
    /// NaN has no nearest bound and maps to `min`.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Whether `value` lies inside the range (bounds included).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// [`clamp`](Self::clamp), logging a warning when the value had to move.
    pub fn clamp_logged(&self, value: f64) -> f64 {
        let clamped = self.clamp(value);
        if !self.contains(value) {
            log::warn!(
                "{} = {}{} is outside [{}, {}]{}, clamped to {}",
                self.name,
                value,
                self.unit,
                self.min,
                self.max,
                self.unit,
                clamped
            );
        }
        clamped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_keeps_in_range_values() {
        assert_eq!(WIDTH_MM.clamp(23.0), 23.0);
        assert_eq!(WIDTH_MM.clamp(10.0), 10.0);
        assert_eq!(WIDTH_MM.clamp(100.0), 100.0);
    }

    #[test]
    fn test_clamp_moves_to_nearest_bound() {
        assert_eq!(HEIGHT_MM.clamp(-1e9), 5.0);
        assert_eq!(HEIGHT_MM.clamp(1e9), 50.0);
        assert_eq!(FREQUENCY_GHZ.clamp(f64::INFINITY), 20.0);
        assert_eq!(FREQUENCY_GHZ.clamp(f64::NEG_INFINITY), 1.0);
        assert_eq!(SOURCE_POWER.clamp(0.0), 0.1);
    }

    #[test]
    fn test_clamp_nan_maps_to_lower_bound() {
        for range in ALL {
            assert_eq!(range.clamp(f64::NAN), range.min, "{}", range.name);
        }
    }

    #[test]
    fn test_clamp_is_idempotent() {
        for range in ALL {
            for raw in [-1e6, range.min - 0.5, range.min, 0.5 * (range.min + range.max), range.max + 3.0, 1e6] {
                let once = range.clamp(raw);
                assert_eq!(range.clamp(once), once, "{} at {}", range.name, raw);
                assert!(range.contains(once));
            }
        }
    }
}
