//! Scenario runner: builds the model, reads probes, samples fields, writes
//! results.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use waveguide_core::constants::{MM_TO_M, M_TO_MM};
use waveguide_core::{
    FieldMap, FieldPlane, FieldProfile, ProbeReading, ProfileLine, TerminationMode,
    WaveguideConfig, WaveguideModel,
};

use crate::config::{ScenarioConfig, WaveguideSection};

/// Snapshot of the model's derived quantities in lab units.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub width_mm: f64,
    pub height_mm: f64,
    pub permittivity: f64,
    pub frequency_ghz: f64,
    pub piston_offset_mm: f64,
    pub source_power: f64,
    pub mode: TerminationMode,
    pub free_space_wavelength_mm: f64,
    pub cutoff_wavelength_mm: f64,
    pub cutoff_frequency_ghz: f64,
    pub propagating: bool,
    pub guided_wavelength_mm: f64,
    pub phase_velocity_m_s: f64,
}

impl Summary {
    pub fn from_model(model: &WaveguideModel) -> Self {
        Self {
            width_mm: model.width_mm(),
            height_mm: model.height_mm(),
            permittivity: model.permittivity(),
            frequency_ghz: model.frequency_ghz(),
            piston_offset_mm: model.piston_offset_mm(),
            source_power: model.source_power(),
            mode: model.termination_mode(),
            free_space_wavelength_mm: model.free_space_wavelength_mm(),
            cutoff_wavelength_mm: model.cutoff_wavelength_mm(),
            cutoff_frequency_ghz: model.cutoff_frequency_ghz(),
            propagating: model.is_propagating(),
            guided_wavelength_mm: model.guided_wavelength_mm(),
            phase_velocity_m_s: model.phase_velocity(),
        }
    }
}

/// A probe reading tagged with the name from the scenario.
#[derive(Debug, Clone, Serialize)]
pub struct NamedReading {
    pub name: String,
    pub reading: ProbeReading,
}

/// Results from a lab run.
#[derive(Debug, Serialize)]
pub struct LabOutput {
    pub summary: Summary,
    pub probes: Vec<NamedReading>,
    pub profile: FieldProfile,
    #[serde(skip)]
    pub map: Option<FieldMap>,
}

/// Build a model from the scenario's waveguide section.
pub fn build_model(section: &WaveguideSection) -> WaveguideModel {
    WaveguideModel::from_config(requested_config(section))
}

fn requested_config(section: &WaveguideSection) -> WaveguideConfig {
    WaveguideConfig {
        width_mm: section.width_mm,
        height_mm: section.height_mm,
        permittivity: section.permittivity,
        frequency_ghz: section.frequency_ghz,
        piston_offset_mm: section.piston_offset_mm,
        source_power: section.source_power,
        termination_mode: section.mode,
    }
}

/// Describe every parameter the model had to change: clamped values and the
/// width repair. Empty when the scenario is used as written.
pub fn adjustments(section: &WaveguideSection, model: &WaveguideModel) -> Vec<String> {
    let requested = requested_config(section);
    let stored = model.config();
    let mut notes = Vec::new();

    let pairs = [
        ("width_mm", requested.width_mm, stored.width_mm),
        ("height_mm", requested.height_mm, stored.height_mm),
        ("permittivity", requested.permittivity, stored.permittivity),
        ("frequency_ghz", requested.frequency_ghz, stored.frequency_ghz),
        ("piston_offset_mm", requested.piston_offset_mm, stored.piston_offset_mm),
        ("source_power", requested.source_power, stored.source_power),
    ];
    for (name, asked, got) in pairs {
        if asked != got {
            notes.push(format!("{} = {} clamped to {}", name, asked, got));
        }
    }

    if model.width_m() != stored.width_mm * MM_TO_M {
        notes.push(format!(
            "width {} mm does not exceed height {} mm; using {:.1} mm",
            stored.width_mm,
            stored.height_mm,
            model.width_mm()
        ));
    }
    notes
}

/// Map a probe offset from the centre line (mm) to the guide frame (m),
/// keeping the probe between the side walls.
fn probe_x_m(model: &WaveguideModel, offset_mm: f64) -> f64 {
    let a = model.width_m();
    (0.5 * a + offset_mm * MM_TO_M).clamp(0.0, a)
}

/// Run a full scenario.
pub fn run_scenario(job: &ScenarioConfig) -> Result<LabOutput> {
    let model = build_model(&job.waveguide);
    for note in adjustments(&job.waveguide, &model) {
        log::warn!("{}", note);
    }
    let summary = Summary::from_model(&model);

    let probes = job
        .probe
        .iter()
        .map(|p| {
            let point = [probe_x_m(&model, p.x_mm), p.y_mm * MM_TO_M, p.z_mm * MM_TO_M];
            NamedReading {
                name: p.name.clone(),
                reading: model.probe(&point, p.time_s),
            }
        })
        .collect();

    let line = ProfileLine {
        x: probe_x_m(&model, job.profile.x_mm),
        y: 0.0,
        z_start: job.profile.z_start_mm * MM_TO_M,
        z_end: job.profile.z_end_mm * MM_TO_M,
        samples: job.profile.points,
    };
    let profile = model
        .sample_profile(&line, job.profile.time_s)
        .context("Invalid [profile] section")?;

    let map = match &job.map {
        Some(m) => {
            let plane = FieldPlane::broad_wall(model.width_m(), m.length_mm * MM_TO_M, m.nx, m.nz);
            Some(model.sample_plane(&plane, m.time_s).context("Invalid [map] section")?)
        }
        None => None,
    };

    Ok(LabOutput { summary, probes, profile, map })
}

/// Print the derived quantities the way the lab panel shows them.
pub fn print_summary(summary: &Summary) {
    println!(
        "Waveguide: {:.1} x {:.1} mm, eps = {:.2}, f = {:.2} GHz, mode = {}",
        summary.width_mm, summary.height_mm, summary.permittivity, summary.frequency_ghz, summary.mode
    );
    println!("  λ0     = {:.1} mm", summary.free_space_wavelength_mm);
    println!("  λc     = {:.1} mm", summary.cutoff_wavelength_mm);
    println!("  fc     = {:.3} GHz", summary.cutoff_frequency_ghz);
    if summary.propagating {
        println!("  λg     = {:.1} mm", summary.guided_wavelength_mm);
        println!("  v_ph   = {:.0} Mm/s", summary.phase_velocity_m_s / 1e6);
        println!("  Propagating");
    } else {
        println!("  λg     = —");
        println!("  v_ph   = —");
        println!("  Below cutoff");
    }
}

pub fn print_probes(probes: &[NamedReading]) {
    for p in probes {
        let r = &p.reading;
        println!(
            "  Probe '{}': x={:.1} mm, z={:.1} mm, |E|={:.3} V/m, |H|={:.4} A/m",
            p.name,
            r.position[0] * M_TO_MM,
            r.position[2] * M_TO_MM,
            r.electric_magnitude,
            r.magnetic_magnitude
        );
    }
}

/// Write the axial profile to a CSV file with a metadata header.
pub fn write_profile_csv(profile: &FieldProfile, summary: &Summary, path: &Path) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writeln!(file, "# Waveguide Lab — Axial Field Profile")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(
        file,
        "# a={:.3} mm, b={:.3} mm, eps={}, f={} GHz, mode={}, piston={} mm",
        summary.width_mm,
        summary.height_mm,
        summary.permittivity,
        summary.frequency_ghz,
        summary.mode,
        summary.piston_offset_mm
    )?;
    writeln!(file, "# t={:e} s", profile.time)?;
    writeln!(file, "#")?;
    writeln!(file, "z_mm,Ey_V_per_m,Hx_A_per_m,Hz_A_per_m")?;

    for (z, (e, h)) in profile.z.iter().zip(profile.electric.iter().zip(profile.magnetic.iter())) {
        writeln!(file, "{:.4},{:.6e},{:.6e},{:.6e}", z * M_TO_MM, e[1], h[0], h[2])?;
    }

    println!("Profile written to: {}", path.display());
    Ok(())
}

/// Write the summary, probe readings and profile to a JSON file.
pub fn write_run_json(output: &LabOutput, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(output)
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {}", e))?;
    std::fs::write(path, json)?;

    println!("Run (JSON) written to: {}", path.display());
    Ok(())
}

/// Write an x–z field map to a CSV file.
pub fn write_map_csv(map: &FieldMap, path: &Path) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writeln!(file, "# Waveguide Lab — Field Intensity Map")?;
    writeln!(file, "# Grid: {}x{}", map.nx, map.nz)?;
    writeln!(
        file,
        "# Extent: x=[{:.2}, {:.2}] z=[{:.2}, {:.2}] mm",
        map.extent[0] * M_TO_MM,
        map.extent[1] * M_TO_MM,
        map.extent[2] * M_TO_MM,
        map.extent[3] * M_TO_MM,
    )?;
    writeln!(file, "#")?;
    writeln!(file, "x_mm,z_mm,|E|_sq,|H|_sq")?;

    let cells = map.electric_intensity.iter().zip(map.magnetic_intensity.iter());
    for (pos, (e2, h2)) in map.positions.iter().zip(cells) {
        writeln!(
            file,
            "{:.4},{:.4},{:.6e},{:.6e}",
            pos[0] * M_TO_MM,
            pos[2] * M_TO_MM,
            e2,
            h2
        )?;
    }

    println!("Field map written to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use approx::assert_abs_diff_eq;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("waveguide-lab-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_default_scenario_runs() {
        let job = parse_config("[[probe]]\nname = \"mid\"\nz_mm = 150.0\n").unwrap();
        let out = run_scenario(&job).unwrap();

        assert!(out.summary.propagating);
        assert_abs_diff_eq!(out.summary.cutoff_frequency_ghz, 6.517, epsilon = 1e-3);
        assert_eq!(out.profile.len(), 100);
        assert_eq!(out.probes.len(), 1);
        // centred probe
        assert_abs_diff_eq!(out.probes[0].reading.position[0], 0.0115, epsilon = 1e-12);
        assert!(out.map.is_none());
    }

    #[test]
    fn test_probe_offset_stays_inside_guide() {
        let model = WaveguideModel::default();
        assert_eq!(probe_x_m(&model, -100.0), 0.0);
        assert_eq!(probe_x_m(&model, 100.0), model.width_m());
    }

    #[test]
    fn test_adjustments_report_clamps_and_repair() {
        let job = parse_config("[waveguide]\nwidth_mm = 20.0\nheight_mm = 80.0\nfrequency_ghz = 0.5\n").unwrap();
        let model = build_model(&job.waveguide);
        let notes = adjustments(&job.waveguide, &model);
        assert!(notes.iter().any(|n| n.starts_with("height_mm = 80 clamped to 50")));
        assert!(notes.iter().any(|n| n.starts_with("frequency_ghz = 0.5 clamped to 1")));
        assert!(notes.iter().any(|n| n.contains("does not exceed height")));

        let clean = parse_config("").unwrap();
        assert!(adjustments(&clean.waveguide, &build_model(&clean.waveguide)).is_empty());
    }

    #[test]
    fn test_bad_profile_is_an_error() {
        let job = parse_config("[profile]\npoints = 1\n").unwrap();
        let err = run_scenario(&job).unwrap_err();
        assert!(format!("{:#}", err).contains("at least 2 samples"));
    }

    #[test]
    fn test_outputs_written() {
        let job = parse_config(
            "[waveguide]\nmode = \"traveling\"\n[[probe]]\nname = \"p\"\nz_mm = 10.0\n[map]\nnx = 4\nnz = 6\n",
        )
        .unwrap();
        let out = run_scenario(&job).unwrap();
        let dir = scratch_dir("outputs");

        let profile_path = dir.join("profile.csv");
        write_profile_csv(&out.profile, &out.summary, &profile_path).unwrap();
        let csv = std::fs::read_to_string(&profile_path).unwrap();
        let data_rows = csv.lines().filter(|l| !l.starts_with('#')).count();
        assert_eq!(data_rows, 1 + 100);
        assert!(csv.contains("mode=traveling"));

        let map_path = dir.join("field_map.csv");
        write_map_csv(out.map.as_ref().unwrap(), &map_path).unwrap();
        let map_csv = std::fs::read_to_string(&map_path).unwrap();
        assert_eq!(map_csv.lines().filter(|l| !l.starts_with('#')).count(), 1 + 24);

        let json_path = dir.join("run.json");
        write_run_json(&out, &json_path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value["summary"]["mode"], "traveling");
        assert_eq!(value["probes"][0]["name"], "p");
        assert_eq!(value["profile"]["z"].as_array().unwrap().len(), 100);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
