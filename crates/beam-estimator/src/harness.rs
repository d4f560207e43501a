// SPDX-License-Identifier: AGPL-3.0-only

//! Timing harness: repeated runs over one batch to find peak throughput.
//!
//! The batch is generated before the harness starts, so random number
//! generation never falls inside a timed window. Every run evaluates the same
//! batch after resetting the run context; a run that raises the escape flag
//! is flagged in its statistics but never stops later runs from executing.

use crate::config::{EscapePolicy, EstimatorConfig};
use crate::error::{EstimatorError, Result};
use crate::generator::TrialBatch;
use crate::run::{RunContext, Tally};
use crate::runtime::ParallelRuntime;
use beam_geometry::Beam;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Measurements from one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStatistics {
    /// Zero-based run index
    pub index: usize,
    /// Wall-clock time of the evaluation
    pub elapsed: Duration,
    /// Outcome counts
    pub tally: Tally,
    /// Whether any trial escaped upward during this run
    pub escape_raised: bool,
}

impl RunStatistics {
    /// Trials touched by this run.
    pub fn trials(&self) -> usize {
        self.tally.total()
    }

    /// Trials per second, or `None` if the run was too fast to time.
    #[allow(clippy::cast_precision_loss)]
    pub fn throughput(&self) -> Option<f64> {
        let secs = self.elapsed.as_secs_f64();
        (secs > 0.0).then(|| self.trials() as f64 / secs)
    }

    /// Millions of trials per second.
    pub fn mega_trials_per_sec(&self) -> Option<f64> {
        self.throughput().map(|t| t / 1e6)
    }

    /// Hit estimate from this run.
    pub fn estimate(&self) -> EstimateResult {
        EstimateResult {
            hits: self.tally.hits,
            trials: self.trials(),
        }
    }
}

/// Throughput aggregated over all runs
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThroughputSummary {
    /// Best trials/second
    pub max: f64,
    /// Mean trials/second over runs that produced a sample
    pub mean: f64,
    /// Runs that produced a throughput sample
    pub samples: usize,
    /// Runs whose elapsed time read as zero
    pub runs_without_sample: usize,
}

impl ThroughputSummary {
    /// Aggregate per-run statistics.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_runs(runs: &[RunStatistics]) -> Self {
        let mut summary = Self::default();
        let mut sum = 0.0;
        for run in runs {
            match run.throughput() {
                Some(t) => {
                    sum += t;
                    summary.samples += 1;
                    if t > summary.max {
                        summary.max = t;
                    }
                }
                None => summary.runs_without_sample += 1,
            }
        }
        if summary.samples > 0 {
            summary.mean = sum / summary.samples as f64;
        }
        summary
    }

    /// Best millions of trials per second.
    pub fn max_mega(&self) -> f64 {
        self.max / 1e6
    }

    /// Mean millions of trials per second.
    pub fn mean_mega(&self) -> f64 {
        self.mean / 1e6
    }
}

/// Final hit estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EstimateResult {
    /// Trials whose reflected beam reached the plate
    pub hits: usize,
    /// Trials in the batch
    pub trials: usize,
}

impl EstimateResult {
    /// `hits / trials`, in `[0, 1]`; zero for an empty batch.
    #[allow(clippy::cast_precision_loss)]
    pub fn probability(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.hits as f64 / self.trials as f64
        }
    }
}

/// Everything one harness invocation measured
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessReport {
    /// Per-run statistics, in execution order
    pub runs: Vec<RunStatistics>,
    /// Aggregate throughput
    pub summary: ThroughputSummary,
    /// Estimate from the last completed run
    pub estimate: EstimateResult,
    /// Worker threads used
    pub threads: usize,
    /// Escape policy in force
    pub escape_policy: EscapePolicy,
    /// Seed of the batch, if it was generated
    pub seed: Option<u64>,
}

impl HarnessReport {
    /// Runs that raised the escape flag.
    pub fn escaped_runs(&self) -> usize {
        self.runs.iter().filter(|r| r.escape_raised).count()
    }
}

/// Repeats batch evaluation and records throughput
#[derive(Debug)]
pub struct Harness<'rt> {
    runtime: &'rt ParallelRuntime,
    beam: Beam,
    tries: usize,
    escape_policy: EscapePolicy,
}

impl<'rt> Harness<'rt> {
    /// Harness over `runtime` using `config.tries` and `config.escape_policy`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `config` does not validate.
    pub fn new(runtime: &'rt ParallelRuntime, config: &EstimatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            runtime,
            beam: Beam::default(),
            tries: config.tries,
            escape_policy: config.escape_policy,
        })
    }

    /// Use a different beam.
    #[must_use]
    pub fn with_beam(mut self, beam: Beam) -> Self {
        self.beam = beam;
        self
    }

    /// Time `tries` runs over `batch`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an empty batch.
    pub fn run(&self, batch: &TrialBatch) -> Result<HarnessReport> {
        if batch.is_empty() {
            return Err(EstimatorError::invalid_config("trial batch is empty"));
        }

        let trials = batch.trials();
        let mut ctx = RunContext::new(self.escape_policy);
        let mut runs = Vec::with_capacity(self.tries);

        for index in 0..self.tries {
            ctx.reset();

            let t0 = Instant::now();
            let tally = ctx.evaluate(self.runtime, trials, &self.beam);
            let elapsed = t0.elapsed();

            let stats = RunStatistics {
                index,
                elapsed,
                tally,
                escape_raised: ctx.escape_raised(),
            };
            debug!(
                "Run {}: {:.3} ms, hits={} miss={} back={} esc={} skip={}",
                index,
                elapsed.as_secs_f64() * 1000.0,
                tally.hits,
                tally.misses,
                tally.backward,
                tally.escapes,
                tally.skipped
            );
            if stats.throughput().is_none() {
                warn!("Run {} elapsed time read as zero; no throughput sample", index);
            }
            runs.push(stats);
        }

        let summary = ThroughputSummary::from_runs(&runs);
        let estimate = runs.last().map(RunStatistics::estimate).unwrap_or_default();

        let escaped = runs.iter().filter(|r| r.escape_raised).count();
        if escaped > 0 && self.escape_policy == EscapePolicy::Skip {
            warn!(
                "{} of {} runs raised the escape flag; trials after it were skipped",
                escaped,
                runs.len()
            );
        }
        info!(
            "{} runs on {} thread(s): max {:.3} Mtrials/s, mean {:.3} Mtrials/s",
            runs.len(),
            self.runtime.threads(),
            summary.max_mega(),
            summary.mean_mega()
        );

        Ok(HarnessReport {
            runs,
            summary,
            estimate,
            threads: self.runtime.threads(),
            escape_policy: self.escape_policy,
            seed: batch.seed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(elapsed_ms: u64, hits: usize, misses: usize) -> RunStatistics {
        RunStatistics {
            index: 0,
            elapsed: Duration::from_millis(elapsed_ms),
            tally: Tally {
                hits,
                misses,
                ..Tally::default()
            },
            escape_raised: false,
        }
    }

    #[test]
    fn test_throughput() {
        let s = stats(500, 10, 990);
        assert!((s.throughput().unwrap() - 2000.0).abs() < 1e-9);
        assert!((s.mega_trials_per_sec().unwrap() - 0.002).abs() < 1e-12);
        assert_eq!(stats(0, 1, 1).throughput(), None);
    }

    #[test]
    fn test_summary_max_and_mean() {
        let runs = [stats(1000, 0, 1000), stats(500, 0, 1000), stats(0, 0, 1000)];
        let s = ThroughputSummary::from_runs(&runs);
        assert_eq!(s.samples, 2);
        assert_eq!(s.runs_without_sample, 1);
        assert!((s.max - 2000.0).abs() < 1e-9);
        assert!((s.mean - 1500.0).abs() < 1e-9);
        assert!(s.max >= s.mean);
    }

    #[test]
    fn test_probability() {
        let e = EstimateResult { hits: 25, trials: 100 };
        assert!((e.probability() - 0.25).abs() < f64::EPSILON);
        assert!(EstimateResult::default().probability().abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_batch_rejected() {
        let rt = ParallelRuntime::new(1).unwrap();
        let cfg = EstimatorConfig::default().with_threads(1).with_tries(2);
        let harness = Harness::new(&rt, &cfg).unwrap();
        let empty = TrialBatch::from_trials(Vec::new());
        assert!(matches!(
            harness.run(&empty),
            Err(EstimatorError::InvalidConfig { .. })
        ));
    }
}
