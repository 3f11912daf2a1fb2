use ad_compositor::config::{self, CompositorConfig};
use ad_compositor::layout::{get_layout_spec, list_archetypes};
use ad_compositor::output::{self, JobOutcome};
use ad_compositor::types::{CompositionInput, CompositionRequest};
use ad_compositor::{Compositor, ImageAsset};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ad-compositor")]
#[command(about = "Deterministic ad composition from scene, product, brand and copy")]
#[command(long_about = "\
Deterministic ad composition from scene, product, brand and copy

Each job is a JSON file describing one ad:

  {
    \"segment_id\": \"busy-parents\",
    \"background_path\": \"scenes/kitchen.png\",
    \"product_image\": \"https://cdn.example.org/cereal.png\",
    \"copy\": { \"headline\": \"...\", \"body_copy\": \"...\", \"cta_text\": \"...\" },
    \"concept\": { \"layout_archetype\": \"Hero Product with Stat Overlay\", ... },
    \"store_brand\": { \"name\": \"...\", \"color_palette\": { \"primary\": \"#E94560\" }, ... },
    \"product_brand\": null,
    \"brand_strategy\": \"store_dominant\",
    \"channel\": { \"platform\": \"instagram\", \"placement\": \"feed\",
                 \"dimensions\": { \"width\": 1080, \"height\": 1080 } },
    \"output_path\": \"out/busy-parents.png\",
    \"output_format\": \"png\"
  }

Relative paths are resolved against the working directory.

Run 'ad-compositor gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compose a single ad from a job file
    Compose {
        /// Job description (JSON)
        job: PathBuf,
    },
    /// Compose many ads in parallel
    Batch {
        /// Job descriptions (JSON)
        #[arg(required = true)]
        jobs: Vec<PathBuf>,
    },
    /// List the built-in layout archetypes and their zones
    Layouts,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Compose { job } => {
            let config = config::load_config(&cli.config_dir)?;
            let compositor = Compositor::new(config);
            let (asset, digest) = run_job(&compositor, &job)?;
            output::print_compose_result(&asset, &digest);
        }
        Command::Batch { jobs } => {
            let config = config::load_config(&cli.config_dir)?;
            init_thread_pool(&config);
            let compositor = Compositor::new(config);

            let outcomes: Vec<JobOutcome> = jobs
                .par_iter()
                .map(|job| match run_job(&compositor, job) {
                    Ok((asset, digest)) => JobOutcome::Composed { asset, digest },
                    Err(e) => {
                        tracing::warn!(job = %job.display(), error = %e, "job failed");
                        JobOutcome::Failed {
                            job: job.clone(),
                            error: e.to_string(),
                        }
                    }
                })
                .collect();

            output::print_batch_summary(&outcomes);
            let failed = outcomes
                .iter()
                .filter(|o| matches!(o, JobOutcome::Failed { .. }))
                .count();
            if failed > 0 {
                return Err(format!("{failed} of {} jobs failed", outcomes.len()).into());
            }
        }
        Command::Layouts => {
            let specs: Vec<_> = list_archetypes().into_iter().map(get_layout_spec).collect();
            output::print_layouts(&specs);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Read a job file, compose it, and hash the written ad.
fn run_job(
    compositor: &Compositor,
    job: &Path,
) -> Result<(ImageAsset, String), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(job)?;
    let request: CompositionRequest = serde_json::from_str(&content)?;
    let input = CompositionInput::try_from(request)?;
    let asset = compositor.compose(&input)?;
    let digest = output::hash_file(&asset.path)?;
    Ok((asset, digest))
}

/// Log to stderr; `RUST_LOG` wins over the `-v` default.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores.
fn init_thread_pool(config: &CompositorConfig) {
    let threads = config::effective_threads(&config.processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
