// SPDX-License-Identifier: AGPL-3.0-only

//! Plain-text summary of a harness invocation.

use crate::harness::HarnessReport;
use std::fmt;

/// Console rendering of a [`HarnessReport`].
///
/// Verbose mode adds the per-run table.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    report: &'a HarnessReport,
    verbose: bool,
}

impl<'a> Report<'a> {
    /// Summary-only rendering.
    pub fn new(report: &'a HarnessReport) -> Self {
        Self {
            report,
            verbose: false,
        }
    }

    /// Include the per-run table.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.report;
        let s = &r.summary;
        let e = &r.estimate;

        writeln!(f, "Laser-bounce Monte Carlo")?;
        writeln!(f, "========================")?;
        match r.seed {
            Some(seed) => writeln!(f, "Seed            : {seed}")?,
            None => writeln!(f, "Seed            : (hand-built batch)")?,
        }
        writeln!(f, "Threads         : {}", r.threads)?;
        writeln!(f, "Escape policy   : {}", r.escape_policy)?;
        writeln!(f, "Runs            : {}", r.runs.len())?;
        writeln!(
            f,
            "Max performance : {:.0} trials/s  ({:.6} Mtrials/s)",
            s.max,
            s.max_mega()
        )?;
        writeln!(
            f,
            "Mean performance: {:.0} trials/s  ({:.6} Mtrials/s)",
            s.mean,
            s.mean_mega()
        )?;
        if s.runs_without_sample > 0 {
            writeln!(f, "Untimed runs    : {}", s.runs_without_sample)?;
        }
        writeln!(f, "Probability     : {:.6}", e.probability())?;
        writeln!(f, "Trials          : {}", e.trials)?;
        writeln!(f, "Hits            : {}", e.hits)?;
        writeln!(f, "Escaped runs    : {} of {}", r.escaped_runs(), r.runs.len())?;

        if self.verbose {
            writeln!(f)?;
            writeln!(
                f,
                "  {:>4}  {:>10}  {:>12}  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}",
                "run", "ms", "Mtrials/s", "hits", "miss", "backward", "escape", "skipped"
            )?;
            for run in &r.runs {
                let mega = run
                    .mega_trials_per_sec()
                    .map_or_else(|| "-".to_string(), |m| format!("{m:.3}"));
                writeln!(
                    f,
                    "  {:>4}  {:>10.3}  {:>12}  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}",
                    run.index,
                    run.elapsed.as_secs_f64() * 1000.0,
                    mega,
                    run.tally.hits,
                    run.tally.misses,
                    run.tally.backward,
                    run.tally.escapes,
                    run.tally.skipped
                )?;
            }
        }
        Ok(())
    }
}
