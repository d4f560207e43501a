// SPDX-License-Identifier: AGPL-3.0-only

//! One evaluation pass over a trial batch.
//!
//! A [`RunContext`] holds the only mutable state a run has: the outcome
//! tally and the escape flag. It is owned by whoever drives the runs and is
//! reset between them, so nothing leaks from one run into the next.
//!
//! ## Escape flag
//!
//! The flag is an `AtomicBool` touched only with `Ordering::Relaxed`. Any
//! worker may raise it; other workers notice it whenever their next load
//! happens to see the store. Under [`EscapePolicy::Skip`] a trial that sees
//! the flag is tallied as skipped instead of evaluated, so with more than one
//! worker the number of skipped trials varies from run to run. With a single
//! worker the batch is walked in order and the cut-off is exact.

use crate::config::EscapePolicy;
use crate::runtime::ParallelRuntime;
use beam_geometry::{evaluate, Beam, TrialOutcome, TrialParameters};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// Per-outcome trial counts for one run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    /// Reflected beam reached the plate
    pub hits: usize,
    /// Beam missed the circle (or degenerate contact)
    pub misses: usize,
    /// First contact behind the origin
    pub backward: usize,
    /// Reflected beam travelled upward
    pub escapes: usize,
    /// Not evaluated because the escape flag was already up
    pub skipped: usize,
}

impl Tally {
    /// Count one outcome.
    pub fn record(&mut self, outcome: TrialOutcome) {
        match outcome {
            TrialOutcome::Hit => self.hits += 1,
            TrialOutcome::Miss => self.misses += 1,
            TrialOutcome::Backward => self.backward += 1,
            TrialOutcome::UpwardEscape => self.escapes += 1,
        }
    }

    /// Sum two tallies.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            hits: self.hits + other.hits,
            misses: self.misses + other.misses,
            backward: self.backward + other.backward,
            escapes: self.escapes + other.escapes,
            skipped: self.skipped + other.skipped,
        }
    }

    /// Trials that were actually evaluated.
    pub fn evaluated(&self) -> usize {
        self.hits + self.misses + self.backward + self.escapes
    }

    /// Every trial the run touched, evaluated or skipped.
    pub fn total(&self) -> usize {
        self.evaluated() + self.skipped
    }
}

/// Run-scoped mutable state: outcome tally and escape flag
#[derive(Debug, Default)]
pub struct RunContext {
    tally: Tally,
    escaped: AtomicBool,
    policy: EscapePolicy,
}

impl RunContext {
    /// Fresh context with the given escape policy.
    pub fn new(policy: EscapePolicy) -> Self {
        Self {
            tally: Tally::default(),
            escaped: AtomicBool::new(false),
            policy,
        }
    }

    /// Clear the tally and lower the escape flag.
    pub fn reset(&mut self) {
        self.tally = Tally::default();
        *self.escaped.get_mut() = false;
    }

    /// Accumulated tally since the last reset.
    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// Hits since the last reset.
    pub fn hits(&self) -> usize {
        self.tally.hits
    }

    /// Whether any trial since the last reset escaped upward.
    pub fn escape_raised(&self) -> bool {
        self.escaped.load(Ordering::Relaxed)
    }

    /// Escape policy in force.
    pub fn policy(&self) -> EscapePolicy {
        self.policy
    }

    /// Evaluate `trials` on the runtime's workers and add the outcomes to the
    /// tally. A single-worker runtime walks the batch in order.
    ///
    /// Returns the tally of this call alone.
    pub fn evaluate(
        &mut self,
        runtime: &ParallelRuntime,
        trials: &[TrialParameters],
        beam: &Beam,
    ) -> Tally {
        if runtime.threads() == 1 {
            return self.evaluate_sequential(trials, beam);
        }

        let escaped = &self.escaped;
        let policy = self.policy;
        let tally = runtime.install(|| {
            trials
                .par_iter()
                .fold(Tally::default, |mut acc, trial| {
                    classify(&mut acc, trial, beam, escaped, policy);
                    acc
                })
                .reduce(Tally::default, Tally::merge)
        });
        self.tally = self.tally.merge(tally);
        tally
    }

    /// Evaluate `trials` in order on the calling thread.
    pub fn evaluate_sequential(&mut self, trials: &[TrialParameters], beam: &Beam) -> Tally {
        let mut tally = Tally::default();
        for trial in trials {
            classify(&mut tally, trial, beam, &self.escaped, self.policy);
        }
        self.tally = self.tally.merge(tally);
        tally
    }
}

#[inline]
fn classify(
    acc: &mut Tally,
    trial: &TrialParameters,
    beam: &Beam,
    escaped: &AtomicBool,
    policy: EscapePolicy,
) {
    if policy == EscapePolicy::Skip && escaped.load(Ordering::Relaxed) {
        acc.skipped += 1;
        return;
    }
    let outcome = evaluate(trial, beam);
    if outcome == TrialOutcome::UpwardEscape {
        escaped.store(true, Ordering::Relaxed);
    }
    acc.record(outcome);
}
