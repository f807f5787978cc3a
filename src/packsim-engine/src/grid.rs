// Copyright 2026 The Packsim Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::item::{Coords, ItemType};

/// Raw value of a cell that can never hold an item.
pub const BLOCKED: i32 = -1;
/// Raw value of a free cell.
pub const EMPTY: i32 = 0;

/// Decoded state of a single grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellState {
    Blocked,
    Empty,
    /// Covered by an instance of the item type at this index.
    Occupied(usize),
}

impl From<i32> for CellState {
    fn from(raw: i32) -> Self {
        match raw {
            EMPTY => CellState::Empty,
            v if v > 0 => CellState::Occupied((v - 1) as usize),
            _ => CellState::Blocked,
        }
    }
}

/// One way an item can legally sit in the grid right now.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Placement {
    /// Top-left corner of the footprint.
    pub pos: Coords,
    pub rotated: bool,
}

/// Occupancy grid for a single packing attempt.
///
/// Cells are stored row-major: 0 is empty, -1 is blocked and `i + 1` means
/// the cell is covered by item type `i`. Blocked cells are fixed at
/// construction and never change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<i32>,
}

impl Grid {
    /// Create an empty grid. Blocked coordinates that fall outside the grid
    /// are ignored.
    pub fn new(width: usize, height: usize, blocked_cells: &[Coords]) -> Self {
        let mut cells = vec![EMPTY; width * height];
        for cell in blocked_cells {
            if cell.x < width && cell.y < height {
                cells[cell.y * width + cell.x] = BLOCKED;
            }
        }

        Grid {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// State of the cell at (x, y). Panics if out of bounds.
    pub fn cell(&self, x: usize, y: usize) -> CellState {
        debug_assert!(x < self.width && y < self.height);
        CellState::from(self.cells[self.offset(x, y)])
    }

    /// Cells that are neither blocked nor covered.
    pub fn free_cells(&self) -> usize {
        self.cells.iter().filter(|&&v| v == EMPTY).count()
    }

    /// Iterate (row-major cell offset, item-type index) for every covered
    /// cell.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > 0)
            .map(|(off, v)| (off, (*v - 1) as usize))
    }

    /// Whether `item` fits at `pos` without leaving the grid or touching a
    /// blocked or covered cell.
    pub fn can_place(&self, item: &ItemType, pos: Coords, rotated: bool) -> bool {
        let (w, h) = item.footprint(rotated);

        let (Some(right), Some(bottom)) = (pos.x.checked_add(w), pos.y.checked_add(h)) else {
            return false;
        };
        if right > self.width || bottom > self.height {
            return false;
        }

        for y in pos.y..bottom {
            let row = self.offset(pos.x, y);
            if self.cells[row..row + w].iter().any(|&v| v != EMPTY) {
                return false;
            }
        }

        true
    }

    /// Mark every cell under the footprint as covered by `item_index`. Does
    /// no checking; callers are expected to have called `can_place`.
    pub fn place(&mut self, item: &ItemType, pos: Coords, item_index: usize, rotated: bool) {
        let (w, h) = item.footprint(rotated);
        let value = item_index as i32 + 1;

        for y in pos.y..pos.y + h {
            let row = self.offset(pos.x, y);
            self.cells[row..row + w].fill(value);
        }
    }

    fn scan_orientation(&self, item: &ItemType, rotated: bool, out: &mut Vec<Placement>) {
        let (w, h) = item.footprint(rotated);
        if w > self.width || h > self.height {
            return;
        }

        for y in 0..=self.height - h {
            for x in 0..=self.width - w {
                let pos = Coords::new(x, y);
                if self.can_place(item, pos, rotated) {
                    out.push(Placement { pos, rotated });
                }
            }
        }
    }

    /// Every placement currently valid for `item`: unrotated anchors in
    /// row-major order, followed by rotated anchors for non-square items.
    pub fn placements(&self, item: &ItemType) -> Vec<Placement> {
        let mut placements = Vec::new();

        self.scan_orientation(item, false, &mut placements);
        if !item.is_square() {
            self.scan_orientation(item, true, &mut placements);
        }

        placements
    }

    /// Same set as `placements`, uniformly shuffled.
    pub fn random_placements<R: Rng + ?Sized>(&self, item: &ItemType, rng: &mut R) -> Vec<Placement> {
        let mut placements = self.placements(item);
        if placements.len() > 1 {
            placements.shuffle(rng);
        }
        placements
    }

    /// How many cells each item type covers, keyed by item-type index.
    pub fn count_item_cells(&self) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        for (_, item_index) in self.occupied_cells() {
            *counts.entry(item_index).or_insert(0) += 1;
        }
        counts
    }

    /// True when every item type covers exactly `count * width * height`
    /// cells.
    pub fn validate_item_counts(&self, items: &[ItemType]) -> bool {
        let counts = self.count_item_cells();

        let all_match = items.iter().enumerate().all(|(i, item)| {
            counts.get(&i).copied().unwrap_or(0) == item.required_cells()
        });

        // cells tagged with an index outside the list are a mismatch too
        all_match && counts.keys().all(|&i| i < items.len())
    }
}
