// Copyright 2026 The Packsim Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

/// Width of the inventory grid the host exposes.
pub const GRID_WIDTH: usize = 9;
/// Height of the inventory grid the host exposes.
pub const GRID_HEIGHT: usize = 5;
/// Largest item width accepted from the host.
pub const MAX_ITEM_WIDTH: usize = 4;
/// Largest item height accepted from the host.
pub const MAX_ITEM_HEIGHT: usize = 4;
/// Largest per-type instance count accepted from the host.
pub const MAX_ITEM_COUNT: usize = 6;
/// Largest grid, in cells, accepted from the host.
pub const MAX_GRID_CELLS: usize = 4096;
/// Upper bound on the number of batches in a run.
pub const MAX_BATCHES: usize = 256;
/// Default number of Monte Carlo samples.
pub const SIMULATIONS: usize = 30000;
/// Default number of independently seeded batches.
pub const SEED_VARIATIONS: usize = 5;
/// Default distance between consecutive batch seeds.
pub const SEED_STRIDE: u64 = 1000;

/// Simulation parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Nominal number of trials across all batches. Each batch gets
    /// `samples / batches` as both its attempt cap and its success target.
    pub samples: usize,
    /// Number of independently seeded batches.
    pub batches: usize,

    /// Run seed. `None` derives one from the system clock on every call.
    pub seed: Option<u64>,
    /// Batch `i` is seeded with `seed + i * seed_stride`.
    pub seed_stride: u64,

    /// Dispatch batches on the rayon thread pool. Ignored on wasm32, where
    /// batches always run sequentially.
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            samples: SIMULATIONS,
            batches: SEED_VARIATIONS,
            seed: None,
            seed_stride: SEED_STRIDE,
            parallel: true,
        }
    }
}

impl SimulationConfig {
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Clamp `batches` to `1..=MAX_BATCHES`.
    pub fn validate(&mut self) {
        self.batches = self.batches.clamp(1, MAX_BATCHES);
    }

    /// Attempt cap and success target of a single batch.
    pub fn samples_per_batch(&self) -> usize {
        self.samples / self.batches.max(1)
    }

    /// Seed for the random stream of batch `batch`.
    pub fn batch_seed(&self, run_seed: u64, batch: usize) -> u64 {
        run_seed.wrapping_add((batch as u64).wrapping_mul(self.seed_stride))
    }
}
