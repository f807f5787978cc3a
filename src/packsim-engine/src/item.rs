// Copyright 2026 The Packsim Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use serde::{Deserialize, Serialize};

/// A cell position in the grid. `x` is the column, `y` the row.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize)]
pub struct Coords {
    pub x: usize,
    pub y: usize,
}

impl Coords {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// A kind of rectangular item and how many instances of it must be placed.
///
/// Item types are identified by their index in the caller's list; the grid
/// stores that index (offset by one) in every cell an instance covers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
pub struct ItemType {
    pub width: usize,
    pub height: usize,
    pub count: usize,
}

impl ItemType {
    pub fn new(width: usize, height: usize, count: usize) -> Self {
        Self {
            width,
            height,
            count,
        }
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Footprint as (width, height), swapped when rotated.
    pub fn footprint(&self, rotated: bool) -> (usize, usize) {
        if rotated {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// Number of cells all instances of this type cover once placed.
    pub fn required_cells(&self) -> usize {
        self.count * self.area()
    }
}

/// An item-type index paired with its sort key, so reordering never loses
/// track of which type an entry refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OrderedItemIndex {
    pub index: usize,
    pub area: usize,
}

impl OrderedItemIndex {
    pub fn new(index: usize, item: &ItemType) -> Self {
        Self {
            index,
            area: item.area(),
        }
    }
}

/// Item-type indices ordered largest footprint first. Ties keep their input
/// order.
pub fn area_order(items: &[ItemType]) -> Vec<usize> {
    let mut ordered: Vec<OrderedItemIndex> = items
        .iter()
        .enumerate()
        .map(|(i, item)| OrderedItemIndex::new(i, item))
        .collect();

    // sort_by is stable
    ordered.sort_by(|a, b| b.area.cmp(&a.area));

    ordered.into_iter().map(|o| o.index).collect()
}

/// Total cells every required instance covers.
pub fn total_required_cells(items: &[ItemType]) -> usize {
    items.iter().map(ItemType::required_cells).sum()
}
