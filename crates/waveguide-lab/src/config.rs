//! TOML scenario deserialisation for lab runs.

use serde::Deserialize;
use waveguide_core::TerminationMode;

/// Top-level scenario.
#[derive(Debug, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub waveguide: WaveguideSection,
    /// Named probe positions to read.
    #[serde(default)]
    pub probe: Vec<ProbeConfig>,
    #[serde(default)]
    pub profile: ProfileConfig,
    /// x–z field map (optional).
    pub map: Option<MapConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Waveguide parameters in user-facing units. Out-of-range values are
/// accepted here and clamped by the model.
#[derive(Debug, Deserialize)]
pub struct WaveguideSection {
    #[serde(default = "default_width")]
    pub width_mm: f64,
    #[serde(default = "default_height")]
    pub height_mm: f64,
    #[serde(default = "default_one")]
    pub permittivity: f64,
    #[serde(default = "default_frequency")]
    pub frequency_ghz: f64,
    #[serde(default)]
    pub piston_offset_mm: f64,
    #[serde(default = "default_one")]
    pub source_power: f64,
    #[serde(default = "default_mode")]
    pub mode: TerminationMode,
}

impl Default for WaveguideSection {
    fn default() -> Self {
        Self {
            width_mm: default_width(),
            height_mm: default_height(),
            permittivity: default_one(),
            frequency_ghz: default_frequency(),
            piston_offset_mm: 0.0,
            source_power: default_one(),
            mode: default_mode(),
        }
    }
}

fn default_width() -> f64 {
    23.0
}
fn default_height() -> f64 {
    10.0
}
fn default_one() -> f64 {
    1.0
}
fn default_frequency() -> f64 {
    9.0
}
fn default_mode() -> TerminationMode {
    TerminationMode::Standing
}

/// A single E/H probe.
#[derive(Debug, Deserialize)]
pub struct ProbeConfig {
    pub name: String,
    /// Offset from the guide centre line across the broad wall (mm).
    /// The probe carriage travels ±a/2 about the centre.
    #[serde(default)]
    pub x_mm: f64,
    #[serde(default)]
    pub y_mm: f64,
    /// Position along the guide (mm).
    pub z_mm: f64,
    /// Sample time (s).
    #[serde(default)]
    pub time_s: f64,
}

/// Axial profile along the guide.
#[derive(Debug, Deserialize)]
pub struct ProfileConfig {
    /// Offset from the centre line (mm). Default: on the centre line.
    #[serde(default)]
    pub x_mm: f64,
    #[serde(default)]
    pub z_start_mm: f64,
    #[serde(default = "default_length")]
    pub z_end_mm: f64,
    #[serde(default = "default_points")]
    pub points: usize,
    #[serde(default)]
    pub time_s: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            x_mm: 0.0,
            z_start_mm: 0.0,
            z_end_mm: default_length(),
            points: default_points(),
            time_s: 0.0,
        }
    }
}

/// Full travel of the piston and the probe carriage (mm).
fn default_length() -> f64 {
    300.0
}
fn default_points() -> usize {
    100
}

/// x–z map across the broad wall.
#[derive(Debug, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_map_nx")]
    pub nx: usize,
    #[serde(default = "default_map_nz")]
    pub nz: usize,
    #[serde(default = "default_length")]
    pub length_mm: f64,
    #[serde(default)]
    pub time_s: f64,
}

fn default_map_nx() -> usize {
    24
}
fn default_map_nz() -> usize {
    120
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to save the axial profile as CSV (default: true).
    #[serde(default = "default_true")]
    pub save_profile: bool,
    /// Whether to also save the run summary and profile as JSON (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_profile: true,
            save_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_true() -> bool {
    true
}

/// Parse a TOML scenario from a string.
pub fn parse_config(content: &str) -> anyhow::Result<ScenarioConfig> {
    let config: ScenarioConfig = toml::from_str(content)?;
    Ok(config)
}

/// Load and parse a TOML scenario file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<ScenarioConfig> {
    use anyhow::Context;

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Invalid scenario {}", path.display()))
}
