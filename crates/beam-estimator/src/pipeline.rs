// SPDX-License-Identifier: AGPL-3.0-only

//! Generate → evaluate → reduce → report, end to end.

use crate::config::EstimatorConfig;
use crate::error::{EstimatorError, Result};
use crate::generator::TrialGenerator;
use crate::harness::{Harness, HarnessReport};
use crate::runtime::ParallelRuntime;

/// Build a runtime for `config.threads` and run the whole estimate.
///
/// # Errors
///
/// Returns `InvalidConfig` for a bad configuration, `MissingCapability` if
/// the host cannot run or time the evaluation.
pub fn estimate(config: &EstimatorConfig) -> Result<HarnessReport> {
    config.validate()?;
    let runtime = ParallelRuntime::new(config.threads)?;
    estimate_with(&runtime, config)
}

/// Run the whole estimate on an existing runtime.
///
/// The batch is generated once, outside any timed window, then timed
/// `config.tries` times.
///
/// # Errors
///
/// Returns `InvalidConfig` if `config` does not validate or asks for a
/// different thread count than `runtime` provides.
pub fn estimate_with(runtime: &ParallelRuntime, config: &EstimatorConfig) -> Result<HarnessReport> {
    config.validate()?;
    if config.threads != runtime.threads() {
        return Err(EstimatorError::invalid_config(format!(
            "config asks for {} threads but runtime has {}",
            config.threads,
            runtime.threads()
        )));
    }

    let mut generator = TrialGenerator::from_seed_or_clock(config.seed);
    let batch = generator.generate(config.trials)?;

    Harness::new(runtime, config)?.run(&batch)
}
