// SPDX-License-Identifier: AGPL-3.0-only

//! `beam` — command-line interface for the laser-bounce Monte Carlo estimator.
//!
//! ```text
//! USAGE:
//!   beam run [--numt N] [--numtrials N] [--numtries N] [--seed S]
//!            [--escape-policy skip|record] [--verbose]
//!   beam info                        Show parallel runtime capabilities
//! ```
//!
//! Defaults come from the build (`NUMT`, `NUMTRIALS`, `NUMTRIES`).
//! Log verbosity follows `RUST_LOG` (default `warn`).

use anyhow::Result;
use beam_estimator::{
    estimate, Capabilities, EscapePolicy, EstimatorConfig, Report, COMPILED_THREADS,
    COMPILED_TRIALS, COMPILED_TRIES,
};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "beam",
    about = "Laser-bounce Monte Carlo probability and throughput estimator",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Generate a trial batch, time repeated runs over it and report.
    Run(RunArgs),
    /// Print detected parallelism and timer resolution.
    Info,
}

#[derive(Args)]
struct RunArgs {
    /// Worker threads.
    #[arg(long = "numt", short = 't', default_value_t = COMPILED_THREADS)]
    threads: usize,

    /// Trials per batch.
    #[arg(long = "numtrials", short = 'n', default_value_t = COMPILED_TRIALS)]
    trials: usize,

    /// Timing repetitions over the batch.
    #[arg(long = "numtries", short = 'r', default_value_t = COMPILED_TRIES)]
    tries: usize,

    /// Fixed RNG seed (default: milliseconds since 2000-01-01).
    #[arg(long)]
    seed: Option<u64>,

    /// What an upward escape does to the rest of a run: `skip` or `record`.
    #[arg(long, default_value_t = EscapePolicy::Skip)]
    escape_policy: EscapePolicy,

    /// Also print the per-run table.
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Cmd::Run(args) => cmd_run(&args)?,
        Cmd::Info => cmd_info(),
    }

    Ok(())
}

fn cmd_run(args: &RunArgs) -> Result<()> {
    let mut config = EstimatorConfig::default()
        .with_threads(args.threads)
        .with_trials(args.trials)
        .with_tries(args.tries)
        .with_escape_policy(args.escape_policy);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    debug!("Running with {:?}", config);

    let report = estimate(&config)?;
    print!("{}", Report::new(&report).verbose(args.verbose));
    Ok(())
}

fn cmd_info() {
    let caps = Capabilities::discover();

    println!("Parallel runtime");
    println!("================");
    match caps.available_parallelism {
        Some(n) => println!("Hardware threads : {n}"),
        None => println!("Hardware threads : (unknown)"),
    }
    match caps.timer_resolution {
        Some(res) => println!(
            "Timer resolution : {:?}  ({})",
            res,
            if caps.has_fine_timer() { "ok" } else { "too coarse" }
        ),
        None => println!("Timer resolution : (clock did not advance)"),
    }
    println!();
    println!("Compiled defaults");
    println!("-----------------");
    println!("NUMT      : {COMPILED_THREADS}");
    println!("NUMTRIALS : {COMPILED_TRIALS}");
    println!("NUMTRIES  : {COMPILED_TRIES}");
}
