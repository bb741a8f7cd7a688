//! Coupling-strength sweeps tracing the synchronization transition.
//!
//! Every coupling value gets its own mean-field run with fresh initial
//! conditions. Run `i` draws from a `ChaCha8Rng` seeded with the sweep's base
//! seed on stream `i`, so results do not depend on execution order or on
//! whether the `parallel` feature is enabled.
//!
//! Failures are isolated per coupling value: a run that cannot be started or
//! diverges is recorded as [`PointOutcome::Failed`] in its slot and the sweep
//! carries on. Invalid shared configuration or an empty coupling list fails
//! the whole sweep before any run starts.

use crate::analysis::long_run_order_parameter;
use crate::config::SweepConfig;
use crate::error::{invalid, Result};
use crate::simulation::simulate_mean_field;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PointOutcome {
    Completed { long_run_r: f64 },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BifurcationPoint {
    pub coupling: f64,
    pub outcome: PointOutcome,
}

impl BifurcationPoint {
    pub fn long_run_r(&self) -> Option<f64> {
        match self.outcome {
            PointOutcome::Completed { long_run_r } => Some(long_run_r),
            PointOutcome::Failed { .. } => None,
        }
    }
}

/// Sweep results in the order the coupling values were supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BifurcationRecord {
    pub points: Vec<BifurcationPoint>,
}

impl BifurcationRecord {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(K, r)` pairs of the completed runs, in record order.
    pub fn pairs(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.long_run_r().map(|r| (p.coupling, r)))
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &BifurcationPoint> {
        self.points.iter().filter(|p| p.long_run_r().is_none())
    }
}

/// `count` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            values[count - 1] = stop;
            values
        }
    }
}

/// Runs one mean-field simulation per coupling value and reports the
/// long-run order parameter of each.
pub fn bifurcation_sweep(k_values: &[f64], config: &SweepConfig) -> Result<BifurcationRecord> {
    validate_sweep(k_values, config)?;
    let base_seed = resolve_seed(config);
    debug!(
        runs = k_values.len(),
        oscillators = config.oscillators,
        steps = config.steps,
        base_seed,
        "starting bifurcation sweep"
    );

    #[cfg(feature = "parallel")]
    let points: Vec<BifurcationPoint> = k_values
        .par_iter()
        .enumerate()
        .map(|(index, &coupling)| run_point(coupling, index, config, base_seed))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let points: Vec<BifurcationPoint> = k_values
        .iter()
        .enumerate()
        .map(|(index, &coupling)| run_point(coupling, index, config, base_seed))
        .collect();

    let record = BifurcationRecord { points };
    info!(
        runs = record.len(),
        failed = record.failures().count(),
        "bifurcation sweep finished"
    );
    Ok(record)
}

fn validate_sweep(k_values: &[f64], config: &SweepConfig) -> Result<()> {
    if k_values.is_empty() {
        invalid!("sweep requires at least one coupling value");
    }
    config.validate()
}

fn resolve_seed(config: &SweepConfig) -> u64 {
    config.seed.unwrap_or_else(|| rand::thread_rng().gen())
}

fn run_rng(base_seed: u64, index: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(base_seed);
    rng.set_stream(index as u64);
    rng
}

fn run_point(
    coupling: f64,
    index: usize,
    config: &SweepConfig,
    base_seed: u64,
) -> BifurcationPoint {
    let mut rng = run_rng(base_seed, index);
    let result = simulate_mean_field(&config.simulation(coupling), &mut rng)
        .and_then(|(trajectory, _)| long_run_order_parameter(&trajectory, config.fraction));

    let outcome = match result {
        Ok(long_run_r) => PointOutcome::Completed { long_run_r },
        Err(err) => {
            warn!(index, coupling, error = %err, "sweep run failed");
            PointOutcome::Failed {
                reason: err.to_string(),
            }
        }
    };
    BifurcationPoint { coupling, outcome }
}

/// Location of the first upward crossing of `threshold` by the long-run order
/// parameter, linearly interpolated between the bracketing couplings.
///
/// Completed points are ordered by coupling first, so unsorted sweeps are
/// handled. Returns `None` when no bracket exists.
pub fn estimate_critical_coupling(record: &BifurcationRecord, threshold: f64) -> Option<f64> {
    let mut pairs = record.pairs();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    pairs.windows(2).find_map(|w| {
        let (k0, r0) = w[0];
        let (k1, r1) = w[1];
        if r0 < threshold && r1 >= threshold {
            Some(k0 + (k1 - k0) * crossing_factor(r0 - threshold, r1 - threshold))
        } else {
            None
        }
    })
}

fn crossing_factor(v0: f64, v1: f64) -> f64 {
    let denominator = v0 - v1;
    if denominator.abs() <= 1e-12 {
        0.5
    } else {
        (v0 / denominator).clamp(0.0, 1.0)
    }
}

/// Progress snapshot of a [`SweepRunner`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepProgress {
    pub done: bool,
    pub completed: usize,
    pub total: usize,
    pub last_point: Option<BifurcationPoint>,
}

/// Serial sweep that advances a batch of coupling values at a time, for
/// callers that report progress between batches.
///
/// Produces exactly the same record as [`bifurcation_sweep`] for the same
/// seed. A run is never interrupted; stopping early yields a consistent
/// prefix of the record.
pub struct SweepRunner {
    k_values: Vec<f64>,
    config: SweepConfig,
    base_seed: u64,
    points: Vec<BifurcationPoint>,
}

impl SweepRunner {
    pub fn new(k_values: Vec<f64>, config: SweepConfig) -> Result<Self> {
        validate_sweep(&k_values, &config)?;
        let base_seed = resolve_seed(&config);
        Ok(Self {
            points: Vec::with_capacity(k_values.len()),
            k_values,
            config,
            base_seed,
        })
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    pub fn is_done(&self) -> bool {
        self.points.len() >= self.k_values.len()
    }

    pub fn run_steps(&mut self, batch_size: usize) -> SweepProgress {
        for _ in 0..batch_size {
            let index = self.points.len();
            let Some(&coupling) = self.k_values.get(index) else {
                break;
            };
            let point = run_point(coupling, index, &self.config, self.base_seed);
            self.points.push(point);
        }
        self.step_result()
    }

    pub fn step_result(&self) -> SweepProgress {
        SweepProgress {
            done: self.is_done(),
            completed: self.points.len(),
            total: self.k_values.len(),
            last_point: self.points.last().cloned(),
        }
    }

    /// Snapshot of the points completed so far.
    pub fn record(&self) -> BifurcationRecord {
        BifurcationRecord {
            points: self.points.clone(),
        }
    }

    pub fn take_result(self) -> BifurcationRecord {
        BifurcationRecord {
            points: self.points,
        }
    }
}
