// Copyright 2026 The Packsim Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use float_cmp::approx_eq;

use packsim_engine::item::total_required_cells;
use packsim_engine::{
    Coords, ErrorCode, ErrorKind, ItemType, ProbabilityMatrix, SimulationConfig,
    calculate_probabilities, calculate_probabilities_with_config, simulate,
};

const TOLERANCE: f64 = 1e-9;

fn seeded(seed: u64, samples: usize) -> SimulationConfig {
    SimulationConfig::default()
        .with_seed(seed)
        .with_samples(samples)
}

/// Shared checks for every successful run.
fn verify_matrix(matrix: &ProbabilityMatrix, items: &[ItemType], label: &str) {
    for (i, cell) in matrix.cells().iter().enumerate() {
        assert!(
            (0.0..=1.0 + TOLERANCE).contains(&cell.total),
            "[{label}] cell {i} total {} outside [0, 1]",
            cell.total
        );
        assert_eq!(items.len(), cell.item_types.len(), "[{label}] cell {i}");

        let by_type: f64 = cell.item_types.iter().sum();
        assert!(
            (by_type - cell.total).abs() < TOLERANCE,
            "[{label}] cell {i}: item types sum to {by_type}, total is {}",
            cell.total
        );
        for p in &cell.item_types {
            assert!((0.0..=1.0 + TOLERANCE).contains(p), "[{label}] cell {i}");
        }
    }

    // every successful packing covers exactly the required cells
    let required = total_required_cells(items) as f64;
    let expected = matrix.expected_occupied_cells();
    assert!(
        (expected - required).abs() < TOLERANCE * matrix.cells().len() as f64,
        "[{label}] expected {required} covered cells, got {expected}"
    );
}

#[test]
fn single_domino_on_open_grid() {
    let items = [ItemType::new(2, 1, 1)];
    let out = simulate(9, 5, &items, &[], seeded(1234, 1000)).unwrap();
    let matrix = &out.probabilities;

    verify_matrix(matrix, &items, "domino");
    assert_eq!(1000, out.report.total_successes());
    assert_eq!(1000, out.report.total_attempts());
    assert!(approx_eq!(
        f64,
        2.0,
        matrix.expected_occupied_cells(),
        epsilon = TOLERANCE
    ));

    // both orientations are possible, so even corners get covered
    for (i, cell) in matrix.cells().iter().enumerate() {
        assert!(cell.total > 0.0, "cell {i} never covered");
    }

    // 40 horizontal + 36 vertical placements; every interior cell is
    // covered by four of them
    for y in 1..4 {
        for x in 1..8 {
            let interior = matrix.get(x, y).unwrap().total;
            assert!(
                (interior - 4.0 / 76.0).abs() < 0.03,
                "interior ({x}, {y}) probability {interior} too far from 4/76"
            );
        }
    }

    // corners are covered by only two placements
    let corner = matrix.get(0, 0).unwrap().total;
    assert!(
        (corner - 2.0 / 76.0).abs() < 0.02,
        "corner probability {corner} too far from 2/76"
    );
}

#[test]
fn oversized_item_is_infeasible() {
    let items = [ItemType::new(3, 2, 1)];
    let err = calculate_probabilities_with_config(2, 2, &items, &[], seeded(5, 1000)).unwrap_err();

    assert_eq!(ErrorKind::Simulation, err.kind);
    assert_eq!(ErrorCode::InfeasibleConfiguration, err.code);
}

#[test]
fn more_cells_than_free_space_is_infeasible() {
    let items = [ItemType::new(2, 2, 1), ItemType::new(1, 1, 1)];
    let blocked = [Coords::new(0, 0)];
    let err = calculate_probabilities_with_config(2, 2, &items, &blocked, seeded(5, 100))
        .unwrap_err();
    assert_eq!(ErrorCode::InfeasibleConfiguration, err.code);
}

#[test]
fn single_free_cell() {
    let free = Coords::new(6, 3);
    let blocked: Vec<Coords> = (0..5)
        .flat_map(|y| (0..9).map(move |x| Coords::new(x, y)))
        .filter(|&c| c != free)
        .collect();
    let items = [ItemType::new(1, 1, 1)];

    let out = simulate(9, 5, &items, &blocked, seeded(77, 500)).unwrap();
    assert_eq!(500, out.report.total_successes());

    let matrix = &out.probabilities;
    verify_matrix(matrix, &items, "single free cell");
    for y in 0..5 {
        for x in 0..9 {
            let cell = matrix.get(x, y).unwrap();
            let expected = if Coords::new(x, y) == free { 1.0 } else { 0.0 };
            assert!(
                approx_eq!(f64, expected, cell.total, epsilon = TOLERANCE),
                "({x}, {y}) = {}",
                cell.total
            );
        }
    }
}

#[test]
fn failures_are_excluded_from_normalization() {
    // two dominoes in a 4x1 strip fail whenever the first lands in the
    // middle (in both phases for 1/9 of trials), but a successful packing
    // always covers every cell
    let items = [ItemType::new(2, 1, 2)];
    let out = simulate(4, 1, &items, &[], seeded(99, 1000)).unwrap();

    let successes = out.report.total_successes();
    assert_eq!(1000, out.report.total_attempts());
    assert!(successes < 1000, "expected some failed trials");
    assert!(successes > 500, "success rate should be near 8/9, got {successes}");

    verify_matrix(&out.probabilities, &items, "strip");
    for cell in out.probabilities.cells() {
        assert!(approx_eq!(f64, 1.0, cell.total, epsilon = TOLERANCE));
        assert!(approx_eq!(f64, 1.0, cell.item_types[0], epsilon = TOLERANCE));
    }
}

#[test]
fn per_type_breakdown_with_blocked_cells() {
    let items = [
        ItemType::new(3, 2, 1),
        ItemType::new(2, 1, 2),
        ItemType::new(1, 1, 3),
    ];
    let blocked = [Coords::new(0, 0), Coords::new(8, 4), Coords::new(4, 2)];

    let out = simulate(9, 5, &items, &blocked, seeded(2026, 2000)).unwrap();
    verify_matrix(&out.probabilities, &items, "mixed");

    for c in blocked {
        let cell = out.probabilities.get(c.x, c.y).unwrap();
        assert_eq!(0.0, cell.total, "blocked cell {c:?} was covered");
    }
}

#[test]
fn clock_seeded_entry_point() {
    let items = [ItemType::new(2, 2, 1), ItemType::new(4, 1, 1)];
    let matrix = calculate_probabilities(9, 5, &items, &[], 500).unwrap();

    assert_eq!(9, matrix.width());
    assert_eq!(5, matrix.height());
    verify_matrix(&matrix, &items, "clock seed");
}

#[test]
fn rows_are_height_by_width() {
    let items = [ItemType::new(1, 1, 2)];
    let matrix =
        calculate_probabilities_with_config(4, 3, &items, &[], seeded(3, 50)).unwrap();
    let rows = matrix.to_rows();

    assert_eq!(3, rows.len());
    assert!(rows.iter().all(|r| r.len() == 4));
    assert_eq!(matrix.get(2, 1), Some(&rows[1][2]));
}
