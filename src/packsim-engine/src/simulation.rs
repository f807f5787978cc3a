// Copyright 2026 The Packsim Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::common::Result;
use crate::config::SimulationConfig;
use crate::grid::Grid;
use crate::input_err;
use crate::item::{Coords, ItemType, area_order};
use crate::probability::{OccupancyCounts, ProbabilityMatrix};

/// How a trial decides which item type to place next.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlacementStrategy {
    /// A fresh uniformly random permutation of item types per trial.
    RandomOrder,
    /// Largest footprint first.
    AreaSorted,
}

impl PlacementStrategy {
    /// Strategies a trial tries, in order, until one places every item.
    pub const FALLBACK_CHAIN: [PlacementStrategy; 2] =
        [PlacementStrategy::RandomOrder, PlacementStrategy::AreaSorted];

    pub fn item_order<R: Rng + ?Sized>(self, items: &[ItemType], rng: &mut R) -> Vec<usize> {
        match self {
            PlacementStrategy::RandomOrder => {
                let mut order: Vec<usize> = (0..items.len()).collect();
                order.shuffle(rng);
                order
            }
            PlacementStrategy::AreaSorted => area_order(items),
        }
    }
}

/// Place every required instance of each item type in `order`, each at a
/// uniformly random valid position and orientation. Stops and returns false
/// as soon as an instance has nowhere to go; earlier placements are never
/// undone.
pub fn place_items<R: Rng + ?Sized>(
    grid: &mut Grid,
    items: &[ItemType],
    order: &[usize],
    rng: &mut R,
) -> bool {
    for &idx in order {
        let item = &items[idx];
        for _ in 0..item.count {
            let placements = grid.random_placements(item, rng);
            let Some(first) = placements.first() else {
                return false;
            };
            grid.place(item, first.pos, idx, first.rotated);
        }
    }
    true
}

/// Final grid of a successful trial and the strategy that produced it.
#[derive(Clone, Debug)]
pub struct TrialOutcome {
    pub grid: Grid,
    pub strategy: PlacementStrategy,
}

/// Run one packing attempt starting from copies of `blank`.
///
/// Each strategy in the fallback chain gets a fresh grid. The first one that
/// places every instance decides the trial: it succeeds only if the cell
/// tally also matches exactly, otherwise the trial is discarded.
pub fn run_trial<R: Rng + ?Sized>(
    blank: &Grid,
    items: &[ItemType],
    rng: &mut R,
) -> Option<TrialOutcome> {
    for strategy in PlacementStrategy::FALLBACK_CHAIN {
        let mut grid = blank.clone();
        let order = strategy.item_order(items, rng);

        if place_items(&mut grid, items, &order, rng) {
            return grid
                .validate_item_counts(items)
                .then_some(TrialOutcome { grid, strategy });
        }
    }

    None
}

/// Statistics for a single batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchReport {
    pub batch: usize,
    pub seed: u64,
    pub attempts: usize,
    pub successes: usize,
    /// Successes that needed the area-sorted fallback.
    pub fallback_successes: usize,
}

/// Statistics for a whole run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationReport {
    pub run_seed: u64,
    pub samples_per_batch: usize,
    pub batches: Vec<BatchReport>,
}

impl SimulationReport {
    pub fn total_attempts(&self) -> usize {
        self.batches.iter().map(|b| b.attempts).sum()
    }

    pub fn total_successes(&self) -> usize {
        self.batches.iter().map(|b| b.successes).sum()
    }

    pub fn fallback_successes(&self) -> usize {
        self.batches.iter().map(|b| b.fallback_successes).sum()
    }
}

/// Result of `simulate`.
#[derive(Clone, Debug)]
pub struct SimulationOutput {
    pub probabilities: ProbabilityMatrix,
    pub report: SimulationReport,
}

/// Run one batch on its own random stream.
///
/// `quota` is both the attempt cap and the success target, so a batch with
/// a high failure rate can end with fewer successes than `quota`.
pub fn run_batch(
    blank: &Grid,
    items: &[ItemType],
    batch: usize,
    seed: u64,
    quota: usize,
) -> (OccupancyCounts, BatchReport) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut counts = OccupancyCounts::new(blank.width(), blank.height(), items.len());
    let mut attempts = 0;
    let mut fallback_successes = 0;

    while attempts < quota && counts.successes() < quota {
        attempts += 1;

        if let Some(outcome) = run_trial(blank, items, &mut rng) {
            counts.record(&outcome.grid);
            if outcome.strategy == PlacementStrategy::AreaSorted {
                fallback_successes += 1;
            }
        }
    }

    let report = BatchReport {
        batch,
        seed,
        attempts,
        successes: counts.successes(),
        fallback_successes,
    };

    debug!(
        batch,
        seed,
        attempts,
        successes = report.successes,
        fallback_successes,
        "batch finished"
    );
    if report.successes < quota {
        warn!(
            batch,
            successes = report.successes,
            quota,
            "batch ended short of its sample quota"
        );
    }

    (counts, report)
}

#[cfg(not(target_arch = "wasm32"))]
fn run_batches(
    blank: &Grid,
    items: &[ItemType],
    config: &SimulationConfig,
    run_seed: u64,
) -> Vec<(OccupancyCounts, BatchReport)> {
    use rayon::prelude::*;

    let quota = config.samples_per_batch();
    let batch = |b: usize| run_batch(blank, items, b, config.batch_seed(run_seed, b), quota);

    if config.parallel {
        (0..config.batches).into_par_iter().map(batch).collect()
    } else {
        (0..config.batches).map(batch).collect()
    }
}

#[cfg(target_arch = "wasm32")]
fn run_batches(
    blank: &Grid,
    items: &[ItemType],
    config: &SimulationConfig,
    run_seed: u64,
) -> Vec<(OccupancyCounts, BatchReport)> {
    let quota = config.samples_per_batch();
    (0..config.batches)
        .map(|b| run_batch(blank, items, b, config.batch_seed(run_seed, b), quota))
        .collect()
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

/// Estimate per-cell occupancy and report how the batches went.
///
/// Batches run independently, each with its own accumulator, and are summed
/// once all of them finish. Probabilities are normalized by the number of
/// trials that actually succeeded, not by `config.samples`.
pub fn simulate(
    width: usize,
    height: usize,
    items: &[ItemType],
    blocked_cells: &[Coords],
    mut config: SimulationConfig,
) -> Result<SimulationOutput> {
    config.validate();
    if width.checked_mul(height).is_none() {
        return input_err!(BadGrid, format!("grid {width}x{height} is too large"));
    }

    let run_seed = config.seed.unwrap_or_else(clock_seed);
    let blank = Grid::new(width, height, blocked_cells);

    let mut counts = OccupancyCounts::new(width, height, items.len());
    let mut batches = Vec::new();
    for (batch_counts, batch_report) in run_batches(&blank, items, &config, run_seed) {
        counts.merge(&batch_counts);
        batches.push(batch_report);
    }

    let report = SimulationReport {
        run_seed,
        samples_per_batch: config.samples_per_batch(),
        batches,
    };

    if counts.successes() == 0 {
        warn!(
            run_seed,
            attempts = report.total_attempts(),
            "no trial placed every item"
        );
    }
    let probabilities = counts.normalize()?;

    info!(
        run_seed,
        attempts = report.total_attempts(),
        successes = report.total_successes(),
        fallback_successes = report.fallback_successes(),
        "simulation finished"
    );

    Ok(SimulationOutput {
        probabilities,
        report,
    })
}

/// Estimate, for every cell, the chance it is covered by any item and by
/// each item type, using the default batch layout and a clock-derived seed.
pub fn calculate_probabilities(
    width: usize,
    height: usize,
    items: &[ItemType],
    blocked_cells: &[Coords],
    samples: usize,
) -> Result<ProbabilityMatrix> {
    let config = SimulationConfig::default().with_samples(samples);
    calculate_probabilities_with_config(width, height, items, blocked_cells, config)
}

/// Like `calculate_probabilities`, with explicit batching and seeding.
pub fn calculate_probabilities_with_config(
    width: usize,
    height: usize,
    items: &[ItemType],
    blocked_cells: &[Coords],
    config: SimulationConfig,
) -> Result<ProbabilityMatrix> {
    simulate(width, height, items, blocked_cells, config).map(|out| out.probabilities)
}
