// Copyright 2026 The Packsim Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Monte Carlo estimate of how likely each cell of a partially blocked grid
//! is to be covered when a fixed set of rectangular items is packed into it.
//!
//! Every trial packs all items into a fresh grid, first in a random item
//! order and, if that gets stuck, largest item first. Successful trials are
//! tallied per cell across independently seeded batches and the tallies are
//! normalized by the number of successes.

#![forbid(unsafe_code)]

pub mod common;
pub mod config;
pub mod grid;
pub mod item;
pub mod json;
pub mod probability;
pub mod simulation;

pub use self::common::{Error, ErrorCode, ErrorKind, Result};
pub use self::config::SimulationConfig;
pub use self::grid::{CellState, Grid, Placement};
pub use self::item::{Coords, ItemType};
pub use self::probability::{CellProbability, ProbabilityMatrix};
pub use self::simulation::{
    PlacementStrategy, SimulationOutput, SimulationReport, calculate_probabilities,
    calculate_probabilities_with_config, simulate,
};
