// SPDX-License-Identifier: AGPL-3.0-only

//! Random trial generation.
//!
//! One generator owns one pseudo-random stream, seeded once. Every batch it
//! produces advances that stream; nothing reseeds it between calls. A fixed
//! seed therefore reproduces the exact same sequence of batches.

use crate::error::Result;
use beam_geometry::ranges::{RMAX, RMIN, XCMAX, XCMIN, YCMAX, YCMIN};
use beam_geometry::TrialParameters;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::info;

/// Seconds from the Unix epoch to 2000-01-01T00:00:00Z.
const Y2K_UNIX_SECS: u64 = 946_684_800;

/// Seed derived from the wall clock: milliseconds since 2000-01-01 UTC.
pub fn time_of_day_seed() -> u64 {
    let since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let since_y2k = since_epoch.saturating_sub(Duration::from_secs(Y2K_UNIX_SECS));
    u64::try_from(since_y2k.as_millis()).unwrap_or(u64::MAX)
}

/// Pseudo-random source of [`TrialParameters`].
#[derive(Debug, Clone)]
pub struct TrialGenerator {
    seed: u64,
    rng: Xoshiro256PlusPlus,
}

impl TrialGenerator {
    /// Generator with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Generator seeded from the time of day.
    pub fn from_time_of_day() -> Self {
        Self::with_seed(time_of_day_seed())
    }

    /// Generator for an optional fixed seed, falling back to the time of day.
    pub fn from_seed_or_clock(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_time_of_day, Self::with_seed)
    }

    /// Seed this generator was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw one trial.
    pub fn next_trial(&mut self) -> TrialParameters {
        TrialParameters::new(
            self.rng.random_range(XCMIN..=XCMAX),
            self.rng.random_range(YCMIN..=YCMAX),
            self.rng.random_range(RMIN..=RMAX),
        )
    }

    /// Draw a batch of `count` trials.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if any generated value falls outside its range.
    pub fn generate(&mut self, count: usize) -> Result<TrialBatch> {
        let t0 = Instant::now();
        let mut trials = Vec::with_capacity(count);
        for _ in 0..count {
            let trial = self.next_trial();
            trial.validate()?;
            trials.push(trial);
        }
        info!(
            "Generated {} trials (seed {}) in {:.2} ms",
            count,
            self.seed,
            t0.elapsed().as_secs_f64() * 1000.0
        );
        Ok(TrialBatch {
            trials: trials.into_boxed_slice(),
            seed: Some(self.seed),
        })
    }
}

/// Immutable batch of trials, shared read-only by every timing run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialBatch {
    trials: Box<[TrialParameters]>,
    seed: Option<u64>,
}

impl TrialBatch {
    /// Wrap hand-built trials. No range validation is applied.
    pub fn from_trials(trials: Vec<TrialParameters>) -> Self {
        Self {
            trials: trials.into_boxed_slice(),
            seed: None,
        }
    }

    /// Read-only view of the trials.
    pub fn trials(&self) -> &[TrialParameters] {
        &self.trials
    }

    /// Number of trials.
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// Seed of the generator that produced this batch, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}
