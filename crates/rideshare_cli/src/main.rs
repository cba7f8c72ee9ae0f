use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rideshare_core::matching::AssignmentStrategy;
use rideshare_core::{optimize, OptimizeResponse, OptimizerConfig, ProblemInput};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "rideshare",
    about = "Ride-share matching and routing optimizer",
    long_about = "Clusters ride requests, assigns vehicles to clusters and solves a\n\
                  capacity-constrained pickup-and-delivery route per vehicle."
)]
struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimize a JSON problem file and write the JSON result
    Optimize(OptimizeArgs),
    /// Print the default configuration as JSON
    DefaultConfig,
}

#[derive(Args)]
struct OptimizeArgs {
    /// Problem file with `requests` and `vehicles`
    #[arg(long)]
    input: PathBuf,
    /// Result file; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
    /// Optimizer configuration file; flags below override it
    #[arg(long, env = "RIDESHARE_CONFIG")]
    config: Option<PathBuf>,
    /// Clustering seed
    #[arg(long)]
    seed: Option<u64>,
    /// Price per kilometre
    #[arg(long)]
    cost_per_km: Option<f64>,
    /// Route search budget per vehicle, in milliseconds
    #[arg(long)]
    time_budget_ms: Option<u64>,
    /// Vehicle-to-cluster assignment
    #[arg(value_enum, long)]
    assignment: Option<AssignmentArg>,
    /// Solve vehicle routes one after another
    #[arg(long)]
    sequential: bool,
    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum AssignmentArg {
    /// Each vehicle, by ascending id, takes its nearest free cluster
    Greedy,
    /// Minimum total vehicle-to-centroid distance
    Hungarian,
}

impl From<AssignmentArg> for AssignmentStrategy {
    fn from(arg: AssignmentArg) -> Self {
        match arg {
            AssignmentArg::Greedy => AssignmentStrategy::Greedy,
            AssignmentArg::Hungarian => AssignmentStrategy::Hungarian,
        }
    }
}

// ── Commands ───────────────────────────────────────────────────────

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(args: &OptimizeArgs) -> Result<OptimizerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => OptimizerConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(cost_per_km) = args.cost_per_km {
        config = config.with_cost_per_km(cost_per_km);
    }
    if let Some(time_budget_ms) = args.time_budget_ms {
        config = config.with_time_budget_ms(time_budget_ms);
    }
    if let Some(assignment) = args.assignment {
        config = config.with_assignment(assignment.into());
    }
    if args.sequential {
        config = config.with_parallel(false);
    }
    Ok(config)
}

/// Malformed input becomes a failure response rather than a process error.
fn respond(input_json: &str, config: &OptimizerConfig) -> OptimizeResponse {
    match ProblemInput::from_json(input_json) {
        Ok(input) => optimize(&input.requests, &input.vehicles, config).into(),
        Err(err) => OptimizeResponse::failure(format!("invalid input: {err}")),
    }
}

fn render(response: &OptimizeResponse, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(response)
    } else {
        serde_json::to_string(response)
    };
    json.context("serializing response")
}

fn write_output(path: Option<&Path>, json: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, json).with_context(|| format!("writing {}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn run_optimize(args: &OptimizeArgs) -> Result<bool> {
    let config = load_config(args)?;
    let input_json = fs::read_to_string(&args.input)
        .with_context(|| format!("reading input {}", args.input.display()))?;

    let response = respond(&input_json, &config);
    match (&response.reason, &response.metrics) {
        (Some(reason), _) => warn!(%reason, "optimization rejected"),
        (None, Some(metrics)) => info!(
            matched = metrics.requests_matched,
            total = metrics.total_requests,
            savings_percent = metrics.savings_percent,
            "optimization succeeded"
        ),
        (None, None) => {}
    }

    write_output(args.output.as_deref(), &render(&response, args.pretty)?)?;
    Ok(response.success)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Optimize(args) => {
            let success = run_optimize(&args)?;
            Ok(if success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::DefaultConfig => {
            println!("{}", serde_json::to_string_pretty(&OptimizerConfig::default())?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
