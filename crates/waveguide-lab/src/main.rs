//! Waveguide lab command-line interface.
//!
//! Run H10 waveguide scenarios from TOML files:
//! ```sh
//! waveguide-lab run bench.toml
//! waveguide-lab validate bench.toml
//! waveguide-lab ranges
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use waveguide_core::params;

#[derive(Parser)]
#[command(name = "waveguide-lab")]
#[command(about = "Waveguide Lab: H10 rectangular waveguide bench")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario from a TOML file.
    Run {
        /// Path to the scenario file.
        config: PathBuf,
        /// Output directory (overrides scenario file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse a scenario and report any values the model would adjust.
    Validate {
        /// Path to the scenario file.
        config: PathBuf,
    },
    /// List the accepted parameter ranges.
    Ranges,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Waveguide Lab");
            println!("=============");
            let job = config::load_config(&config)?;
            println!("Scenario: {}", config.display());

            let result = runner::run_scenario(&job)?;
            runner::print_summary(&result.summary);
            runner::print_probes(&result.probes);

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            if job.output.save_profile {
                runner::write_profile_csv(&result.profile, &result.summary, &out_dir.join("profile.csv"))?;
            }

            if job.output.save_json {
                runner::write_run_json(&result, &out_dir.join("run.json"))?;
            }

            if let Some(map) = &result.map {
                runner::write_map_csv(map, &out_dir.join("field_map.csv"))?;
            }

            println!("Run complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            let model = runner::build_model(&job.waveguide);
            let notes = runner::adjustments(&job.waveguide, &model);
            if notes.is_empty() {
                println!("Scenario is valid: {}", config.display());
            } else {
                println!("Scenario is valid with adjustments: {}", config.display());
                for note in notes {
                    println!("  {}", note);
                }
            }
            Ok(())
        }
        Commands::Ranges => {
            println!("Accepted parameter ranges (values outside are clamped):");
            println!();
            for range in params::ALL {
                println!("  {:<18} [{}, {}] {}", range.name, range.min, range.max, range.unit);
            }
            println!();
            println!("  width is raised to height + 1 mm when it does not exceed height");
            Ok(())
        }
    }
}
