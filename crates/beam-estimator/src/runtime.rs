// SPDX-License-Identifier: AGPL-3.0-only

//! Parallel runtime and host capability discovery.
//!
//! The estimator needs two things from the host: a pool of worker threads
//! that can run a fork-join loop with a sum reduction, and a monotonic clock
//! fine enough to time a run. Both are probed at startup; if either is
//! missing the estimator refuses to run rather than report meaningless
//! throughput.

use crate::error::{EstimatorError, Result};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Coarsest acceptable timer tick.
pub(crate) const MAX_TIMER_RESOLUTION: Duration = Duration::from_millis(1);

/// Clock reads per resolution sample before giving up on seeing a tick.
const TIMER_SPIN_LIMIT: u32 = 10_000_000;

/// Resolution samples taken by [`probe_timer_resolution`].
const TIMER_SAMPLES: usize = 16;

/// Host capabilities relevant to the estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Hardware threads reported by the OS, if known
    pub available_parallelism: Option<NonZeroUsize>,

    /// Smallest observed tick of the monotonic clock, if one was observed
    pub timer_resolution: Option<Duration>,
}

impl Capabilities {
    /// Probe the host.
    pub fn discover() -> Self {
        let available_parallelism = std::thread::available_parallelism().ok();
        let timer_resolution = probe_timer_resolution();
        debug!(
            "Capabilities: parallelism={:?} timer_resolution={:?}",
            available_parallelism, timer_resolution
        );
        Self {
            available_parallelism,
            timer_resolution,
        }
    }

    /// Whether the clock ticks at sub-millisecond resolution.
    pub fn has_fine_timer(&self) -> bool {
        self.timer_resolution
            .is_some_and(|res| res <= MAX_TIMER_RESOLUTION)
    }

    /// Fail unless the host can time runs.
    ///
    /// # Errors
    ///
    /// Returns `MissingCapability` if the monotonic clock is coarser than
    /// 1 ms or never advanced during discovery.
    pub fn require_timer(&self) -> Result<()> {
        match self.timer_resolution {
            Some(res) if res <= MAX_TIMER_RESOLUTION => Ok(()),
            Some(res) => Err(EstimatorError::missing_capability(format!(
                "monotonic timer resolution {res:?} is coarser than {MAX_TIMER_RESOLUTION:?}"
            ))),
            None => Err(EstimatorError::missing_capability(
                "monotonic timer did not advance",
            )),
        }
    }
}

/// Smallest non-zero step between consecutive `Instant` reads.
///
/// Returns `None` if the clock never advanced within the spin limit.
pub(crate) fn probe_timer_resolution() -> Option<Duration> {
    let mut best: Option<Duration> = None;
    for _ in 0..TIMER_SAMPLES {
        let start = Instant::now();
        let mut spins = 0;
        let step = loop {
            let now = Instant::now();
            let step = now.duration_since(start);
            if !step.is_zero() {
                break Some(step);
            }
            spins += 1;
            if spins >= TIMER_SPIN_LIMIT {
                break None;
            }
        };
        match (best, step) {
            (_, None) => return best,
            (None, Some(s)) => best = Some(s),
            (Some(b), Some(s)) => best = Some(b.min(s)),
        }
    }
    best
}

/// Worker pool that evaluates trial batches
#[derive(Debug)]
pub struct ParallelRuntime {
    pool: ThreadPool,
    threads: usize,
    capabilities: Capabilities,
}

impl ParallelRuntime {
    /// Probe the host and build a pool of `threads` workers.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for zero threads and `MissingCapability` if the
    /// clock is too coarse or the pool cannot be created.
    pub fn new(threads: usize) -> Result<Self> {
        Self::with_capabilities(threads, Capabilities::discover())
    }

    /// Build a pool using already-discovered capabilities.
    ///
    /// # Errors
    ///
    /// As for [`ParallelRuntime::new`].
    pub fn with_capabilities(threads: usize, capabilities: Capabilities) -> Result<Self> {
        if threads == 0 {
            return Err(EstimatorError::invalid_config("thread count must be at least 1"));
        }
        capabilities.require_timer()?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("beam-worker-{i}"))
            .build()
            .map_err(|e| {
                EstimatorError::missing_capability(format!("cannot start {threads} worker threads: {e}"))
            })?;

        if let Some(hw) = capabilities.available_parallelism {
            if threads > hw.get() {
                info!("Requested {} threads on {} hardware threads", threads, hw);
            }
        }
        info!("Parallel runtime ready: {} worker thread(s)", threads);

        Ok(Self {
            pool,
            threads,
            capabilities,
        })
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Capabilities the runtime was built against.
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Run `op` inside the pool; parallel iterators in `op` use its workers.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}
