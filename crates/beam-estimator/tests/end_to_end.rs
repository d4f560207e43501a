//! End-to-end estimator tests
//!
//! Generate a batch, time several runs over it and check the aggregate
//! properties that must hold for any seed, plus the recorded tallies for the
//! fixed baseline seed.

use beam_estimator::{
    estimate, EscapePolicy, EstimatorConfig, Harness, ParallelRuntime, Tally, TrialGenerator,
};

/// Seed of the recorded baseline (1 thread, 1000 trials).
const BASELINE_SEED: u64 = 20_240_601;

/// Per-run tally under `EscapePolicy::Skip` for the baseline.
const BASELINE_SKIP: Tally = Tally {
    hits: 9,
    misses: 19,
    backward: 40,
    escapes: 1,
    skipped: 931,
};

/// Per-run tally under `EscapePolicy::Record` for the baseline.
const BASELINE_RECORD: Tally = Tally {
    hits: 119,
    misses: 297,
    backward: 562,
    escapes: 22,
    skipped: 0,
};

fn config(threads: usize, trials: usize, policy: EscapePolicy) -> EstimatorConfig {
    EstimatorConfig::default()
        .with_threads(threads)
        .with_trials(trials)
        .with_tries(4)
        .with_seed(BASELINE_SEED)
        .with_escape_policy(policy)
}

fn assert_baseline(policy: EscapePolicy, expected: Tally, probability: f64) {
    let report = estimate(&config(1, 1000, policy)).expect("baseline estimate");

    assert_eq!(report.seed, Some(BASELINE_SEED));
    for run in &report.runs {
        assert_eq!(run.tally, expected, "run {} under {policy}", run.index);
    }
    assert_eq!(report.estimate.hits, expected.hits);
    assert_eq!(report.estimate.trials, 1000);
    assert!((report.estimate.probability() - probability).abs() < 1e-12);
}

#[test]
fn test_sequential_skip_matches_recorded_baseline() {
    assert_baseline(EscapePolicy::Skip, BASELINE_SKIP, 0.009);
    assert_eq!(BASELINE_SKIP.total(), 1000);
}

#[test]
fn test_sequential_record_matches_recorded_baseline() {
    assert_baseline(EscapePolicy::Record, BASELINE_RECORD, 0.119);
    assert_eq!(BASELINE_RECORD.total(), 1000);
}

#[test]
fn test_sequential_run_is_reproducible() {
    let cfg = config(1, 1000, EscapePolicy::Skip);
    let a = estimate(&cfg).expect("first estimate");
    let b = estimate(&cfg).expect("second estimate");

    assert_eq!(a.estimate, b.estimate);
    assert_eq!(a.seed, Some(BASELINE_SEED));
    assert_eq!(a.estimate.trials, 1000);

    // Every run inside one invocation sees a freshly reset context.
    let first = a.runs[0].tally;
    assert!(a.runs.iter().all(|r| r.tally == first));
}

#[test]
fn test_sequential_skip_stops_counting_after_first_escape() {
    let batch = TrialGenerator::with_seed(11).generate(5000).unwrap();
    let rt = ParallelRuntime::new(1).unwrap();

    let skip = Harness::new(&rt, &config(1, 5000, EscapePolicy::Skip))
        .unwrap()
        .run(&batch)
        .unwrap();
    let record = Harness::new(&rt, &config(1, 5000, EscapePolicy::Record))
        .unwrap()
        .run(&batch)
        .unwrap();

    let skip_tally = skip.runs[0].tally;
    let record_tally = record.runs[0].tally;

    // A batch this size always contains an upward escape.
    assert_eq!(skip_tally.escapes, 1);
    assert!(skip.runs.iter().all(|r| r.escape_raised));
    assert_eq!(skip_tally.evaluated() + skip_tally.skipped, 5000);
    assert!(skip_tally.hits <= record_tally.hits);
    assert_eq!(record_tally.skipped, 0);
}

#[test]
fn test_parallel_record_matches_sequential() {
    let batch = TrialGenerator::with_seed(3).generate(50_000).unwrap();

    let seq_rt = ParallelRuntime::new(1).unwrap();
    let par_rt = ParallelRuntime::new(4).unwrap();

    let seq = Harness::new(&seq_rt, &config(1, 50_000, EscapePolicy::Record))
        .unwrap()
        .run(&batch)
        .unwrap();
    let par = Harness::new(&par_rt, &config(4, 50_000, EscapePolicy::Record))
        .unwrap()
        .run(&batch)
        .unwrap();

    assert_eq!(seq.estimate, par.estimate);
    for run in &par.runs {
        assert_eq!(run.tally, seq.runs[0].tally);
    }
}

#[test]
fn test_probability_and_throughput_bounds() {
    let report = estimate(&config(4, 20_000, EscapePolicy::Skip)).unwrap();

    assert!(report.estimate.hits <= report.estimate.trials);
    let p = report.estimate.probability();
    assert!((0.0..=1.0).contains(&p));

    for run in &report.runs {
        assert_eq!(run.trials(), 20_000);
        if let Some(t) = run.throughput() {
            assert!(t.is_finite() && t >= 0.0);
        }
    }
    let s = report.summary;
    assert!(s.max >= s.mean);
    assert_eq!(s.samples + s.runs_without_sample, report.runs.len());
}

#[test]
fn test_record_probability_near_reference() {
    // Roughly 13% of uniformly placed circles bounce the beam onto the plate.
    let report = estimate(&config(2, 200_000, EscapePolicy::Record)).unwrap();
    let p = report.estimate.probability();
    assert!((0.12..0.145).contains(&p), "probability {p}");
}

#[test]
fn test_thread_mismatch_rejected() {
    let rt = ParallelRuntime::new(2).unwrap();
    let cfg = config(3, 100, EscapePolicy::Skip);
    assert!(beam_estimator::estimate_with(&rt, &cfg).is_err());
}
