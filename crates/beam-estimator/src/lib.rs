// SPDX-License-Identifier: AGPL-3.0-only

//! Parallel Monte Carlo estimator for the laser-bounce experiment.
//!
//! A laser fired from the origin at 30° strikes a randomly placed circle and
//! reflects. This crate estimates the probability that the reflected beam
//! lands on the plate at `y = 0`, and measures how fast a pool of worker
//! threads can evaluate the trials.
//!
//! # Pipeline
//!
//! ```text
//! TrialGenerator ──generate()──▶ TrialBatch   (once, untimed)
//!                                    │
//!              ┌─────────────────────┘  &[TrialParameters]
//!              ▼
//! Harness::run ── tries × { RunContext::reset, RunContext::evaluate }  (timed)
//!              │                              │
//!              │                      rayon par_iter + fold/reduce
//!              ▼
//!        HarnessReport ──▶ Report (Display)
//! ```
//!
//! # Quick start
//!
//! ```no_run
//! use beam_estimator::{estimate, EstimatorConfig, Report};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EstimatorConfig::default()
//!     .with_threads(4)
//!     .with_trials(100_000)
//!     .with_seed(2024);
//! let report = estimate(&config)?;
//! println!("{}", Report::new(&report));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]

mod config;
mod error;
mod generator;
mod harness;
mod pipeline;
mod report;
mod run;
mod runtime;

pub use beam_geometry::{Beam, TrialOutcome, TrialParameters};
pub use config::{
    EscapePolicy, EstimatorConfig, COMPILED_THREADS, COMPILED_TRIALS, COMPILED_TRIES,
    DEFAULT_THREADS, DEFAULT_TRIALS, DEFAULT_TRIES,
};
pub use error::{EstimatorError, Result};
pub use generator::{time_of_day_seed, TrialBatch, TrialGenerator};
pub use harness::{EstimateResult, Harness, HarnessReport, RunStatistics, ThroughputSummary};
pub use pipeline::{estimate, estimate_with};
pub use report::Report;
pub use run::{RunContext, Tally};
pub use runtime::{Capabilities, ParallelRuntime};

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        estimate, EscapePolicy, EstimatorConfig, EstimatorError, Harness, HarnessReport,
        ParallelRuntime, Report, Result, TrialBatch, TrialGenerator,
    };
}
