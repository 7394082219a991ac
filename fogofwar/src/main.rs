use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::time::Instant;
use workflow::config::RunConfig;
use workflow::runner::{FileOutcome, Runner};

mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Fog-of-war filter for Tacview ACMI recordings")]
struct Args {
    /// Load the run configuration from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "Tacview")]
    input_dir: PathBuf,
    #[arg(long, default_value = "Output")]
    output_dir: PathBuf,
    /// Weapon search radius in meters
    #[arg(long, default_value_t = 50)]
    weapon_radius: u32,
    /// Discover recordings and derive output names only
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// Parse and report object counts without writing
    #[arg(long, default_value_t = false)]
    read_only: bool,
    /// Skip the per-object narrative
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let started = Instant::now();

    let run_config = if let Some(path) = args.config {
        RunConfig::load(path)?
    } else {
        RunConfig::from_args(
            args.input_dir,
            args.output_dir,
            args.weapon_radius,
            args.dry_run,
            args.read_only,
            !args.quiet,
        )
    };

    let runner = Runner::new(run_config)?;
    let summary = runner.execute()?;

    for (path, outcome) in &summary.outcomes {
        let status = match outcome {
            FileOutcome::DryRun => "dry run".to_string(),
            FileOutcome::ReadOnly { active, inactive } => {
                format!("read only, active {} inactive {}", active, inactive)
            }
            FileOutcome::Written {
                active,
                inactive,
                sentences,
            } => format!(
                "written, active {} inactive {} sentences {}",
                active, inactive, sentences
            ),
            FileOutcome::AlreadyExists => "output exists".to_string(),
            FileOutcome::Invalid(missing) => format!("skipped, missing {}", missing.join(", ")),
        };
        println!("{} -> {}", path.display(), status);
    }
    for (path, reason) in &summary.failures {
        println!("{} -> failed: {}", path.display(), reason);
    }

    info!(
        "TOTAL EXECUTION TIME: {:.3} sec",
        started.elapsed().as_secs_f64()
    );
    println!(
        "Run complete -> {} written, {} skipped, {} failed",
        summary.written(),
        summary.outcomes.len() - summary.written(),
        summary.failures.len()
    );
    Ok(())
}
