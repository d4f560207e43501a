// SPDX-License-Identifier: AGPL-3.0-only

//! Estimator configuration.
//!
//! Defaults are compiled in. Each may be overridden at build time by setting
//! `NUMT`, `NUMTRIALS` or `NUMTRIES` in the environment of `cargo build`, and
//! again at run time through the `with_*` builders (the CLI maps its flags
//! onto these).

use crate::error::{EstimatorError, Result};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Worker threads when nothing overrides it.
pub const DEFAULT_THREADS: usize = 8;
/// Trials per batch when nothing overrides it.
pub const DEFAULT_TRIALS: usize = 1_000_000;
/// Timing repetitions when nothing overrides it.
pub const DEFAULT_TRIES: usize = 10;

/// Worker threads baked in at build time (`NUMT`).
pub const COMPILED_THREADS: usize = parse_or(option_env!("NUMT"), DEFAULT_THREADS);
/// Trials per batch baked in at build time (`NUMTRIALS`).
pub const COMPILED_TRIALS: usize = parse_or(option_env!("NUMTRIALS"), DEFAULT_TRIALS);
/// Timing repetitions baked in at build time (`NUMTRIES`).
pub const COMPILED_TRIES: usize = parse_or(option_env!("NUMTRIES"), DEFAULT_TRIES);

/// Parse a decimal build-time override, allowing `_` separators.
///
/// Anything unparsable falls back to `default`.
const fn parse_or(value: Option<&str>, default: usize) -> usize {
    let Some(s) = value else {
        return default;
    };
    let bytes = s.as_bytes();
    let mut n: usize = 0;
    let mut digits = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        i += 1;
        if b == b'_' {
            continue;
        }
        if !b.is_ascii_digit() {
            return default;
        }
        n = match n.checked_mul(10) {
            Some(v) => match v.checked_add((b - b'0') as usize) {
                Some(v) => v,
                None => return default,
            },
            None => return default,
        };
        digits += 1;
    }
    if digits == 0 {
        default
    } else {
        n
    }
}

/// What an upward escape does to the remainder of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EscapePolicy {
    /// Raise the run's escape flag; trials that observe the flag are skipped
    /// and never counted. Under parallel execution the cut-off is
    /// best-effort.
    #[default]
    Skip,
    /// Raise and report the flag, but keep evaluating and counting every
    /// trial. Hit counts are then independent of scheduling.
    Record,
}

impl fmt::Display for EscapePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Skip => "skip",
            Self::Record => "record",
        })
    }
}

impl FromStr for EscapePolicy {
    type Err = EstimatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "record" => Ok(Self::Record),
            other => Err(EstimatorError::invalid_config(format!(
                "unknown escape policy '{other}' (expected 'skip' or 'record')"
            ))),
        }
    }
}

/// Estimator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimatorConfig {
    /// Worker threads in the evaluation pool
    pub threads: usize,
    /// Trials in the batch
    pub trials: usize,
    /// Timing repetitions over the batch
    pub tries: usize,
    /// Fixed RNG seed; `None` seeds from the time of day
    pub seed: Option<u64>,
    /// Upward-escape handling
    pub escape_policy: EscapePolicy,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            threads: COMPILED_THREADS,
            trials: COMPILED_TRIALS,
            tries: COMPILED_TRIES,
            seed: None,
            escape_policy: EscapePolicy::default(),
        }
    }
}

impl EstimatorConfig {
    /// Set the worker thread count.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set the batch size.
    #[must_use]
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    /// Set the number of timing repetitions.
    #[must_use]
    pub fn with_tries(mut self, tries: usize) -> Self {
        self.tries = tries;
        self
    }

    /// Fix the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the escape policy.
    #[must_use]
    pub fn with_escape_policy(mut self, policy: EscapePolicy) -> Self {
        self.escape_policy = policy;
        self
    }

    /// Reject configurations that cannot produce a measurement.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if any count is zero.
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(EstimatorError::invalid_config("thread count must be at least 1"));
        }
        if self.trials == 0 {
            return Err(EstimatorError::invalid_config("trial count must be at least 1"));
        }
        if self.tries == 0 {
            return Err(EstimatorError::invalid_config("try count must be at least 1"));
        }
        debug!(
            "Config: threads={} trials={} tries={} seed={:?} escape={}",
            self.threads, self.trials, self.tries, self.seed, self.escape_policy
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or() {
        assert_eq!(parse_or(None, 8), 8);
        assert_eq!(parse_or(Some("4"), 8), 4);
        assert_eq!(parse_or(Some("1_000_000"), 8), 1_000_000);
        assert_eq!(parse_or(Some(""), 8), 8);
        assert_eq!(parse_or(Some("_"), 8), 8);
        assert_eq!(parse_or(Some("12x"), 8), 8);
        assert_eq!(parse_or(Some("99999999999999999999999999"), 8), 8);
    }

    #[test]
    fn test_default_validates() {
        assert!(EstimatorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_counts_rejected() {
        let base = EstimatorConfig::default();
        for cfg in [
            base.clone().with_threads(0),
            base.clone().with_trials(0),
            base.with_tries(0),
        ] {
            assert!(matches!(cfg.validate(), Err(EstimatorError::InvalidConfig { .. })));
        }
    }

    #[test]
    fn test_escape_policy_parse() {
        assert_eq!("skip".parse::<EscapePolicy>().unwrap(), EscapePolicy::Skip);
        assert_eq!("Record".parse::<EscapePolicy>().unwrap(), EscapePolicy::Record);
        assert!("abort".parse::<EscapePolicy>().is_err());
        assert_eq!(EscapePolicy::Record.to_string(), "record");
    }
}
