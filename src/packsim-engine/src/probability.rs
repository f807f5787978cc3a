// Copyright 2026 The Packsim Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use serde::{Deserialize, Serialize};

use crate::common::Result;
use crate::grid::Grid;
use crate::sim_err;

/// Raw per-cell occupancy tallies over successful trials.
///
/// Each batch owns one of these; batches are combined with `merge`, which
/// is plain element-wise addition, so the order batches finish in does not
/// matter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyCounts {
    width: usize,
    height: usize,
    item_types: usize,
    /// Successful trials recorded.
    successes: usize,
    /// Per cell, how many successful trials covered it.
    totals: Vec<u64>,
    /// Per cell and item type, laid out as `cell * item_types + item`.
    by_type: Vec<u64>,
}

impl OccupancyCounts {
    pub fn new(width: usize, height: usize, item_types: usize) -> Self {
        let cells = width * height;
        Self {
            width,
            height,
            item_types,
            successes: 0,
            totals: vec![0; cells],
            by_type: vec![0; cells * item_types],
        }
    }

    pub fn successes(&self) -> usize {
        self.successes
    }

    /// Record the final grid of a successful trial.
    pub fn record(&mut self, grid: &Grid) {
        debug_assert_eq!(grid.width(), self.width);
        debug_assert_eq!(grid.height(), self.height);

        for (cell, item) in grid.occupied_cells() {
            self.totals[cell] += 1;
            self.by_type[cell * self.item_types + item] += 1;
        }
        self.successes += 1;
    }

    /// Fold another accumulator of the same shape into this one.
    pub fn merge(&mut self, other: &OccupancyCounts) {
        debug_assert_eq!(self.totals.len(), other.totals.len());
        debug_assert_eq!(self.item_types, other.item_types);

        self.successes += other.successes;
        for (a, b) in self.totals.iter_mut().zip(&other.totals) {
            *a += b;
        }
        for (a, b) in self.by_type.iter_mut().zip(&other.by_type) {
            *a += b;
        }
    }

    /// Scale every tally by `1 / successes`. Fails when no trial succeeded,
    /// since nothing can be estimated from zero samples.
    pub fn normalize(&self) -> Result<ProbabilityMatrix> {
        if self.successes == 0 {
            return sim_err!(
                InfeasibleConfiguration,
                "no successful simulations; grid data is most likely invalid".to_owned()
            );
        }

        let factor = 1.0 / self.successes as f64;
        let cells = (0..self.totals.len())
            .map(|cell| {
                let start = cell * self.item_types;
                CellProbability {
                    total: self.totals[cell] as f64 * factor,
                    item_types: self.by_type[start..start + self.item_types]
                        .iter()
                        .map(|&n| n as f64 * factor)
                        .collect(),
                }
            })
            .collect();

        Ok(ProbabilityMatrix {
            width: self.width,
            height: self.height,
            cells,
        })
    }
}

/// Chance a cell is covered by any item, and by each item type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellProbability {
    pub total: f64,
    /// Indexed like the caller's item list.
    pub item_types: Vec<f64>,
}

/// Per-cell probabilities for the whole grid, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbabilityMatrix {
    width: usize,
    height: usize,
    cells: Vec<CellProbability>,
}

impl ProbabilityMatrix {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&CellProbability> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x)
    }

    pub fn cells(&self) -> &[CellProbability] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellProbability]> {
        // chunks() rejects a zero chunk size
        self.cells.chunks(self.width.max(1))
    }

    /// Sum of every cell's total; the expected number of covered cells in a
    /// successful packing.
    pub fn expected_occupied_cells(&self) -> f64 {
        self.cells.iter().map(|c| c.total).sum()
    }

    /// Nested rows, the shape hosts hand back to their callers.
    pub fn to_rows(&self) -> Vec<Vec<CellProbability>> {
        self.rows().map(<[CellProbability]>::to_vec).collect()
    }
}
