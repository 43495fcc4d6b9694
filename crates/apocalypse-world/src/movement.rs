//! Greedy single-step movement against a frozen distance field.
//!
//! Every entity is evaluated against the same field and the same starting
//! positions, so the order of `entities` never changes the outcome. Staying
//! put is always a candidate, and a neighbor only wins by strictly improving
//! on the best value seen so far. Ties therefore go to the earliest neighbor
//! in enumeration order, and to the current cell over any neighbor.

use crate::field::DistanceField;
use crate::grid::Grid;
use apocalypse_core::Cell;
use tracing::trace;

/// Move each entity to the empty 8-way neighbor with the largest field value
pub fn move_away(grid: &Grid, entities: &[Cell], field: &DistanceField) -> Vec<Cell> {
    entities
        .iter()
        .map(|&cell| {
            let neighbors = grid.eight_neighbors(cell.row, cell.col);
            best_neighbor(grid, cell, neighbors, field, |candidate, best| candidate > best)
        })
        .collect()
}

/// Move each entity to the empty 4-way neighbor with the smallest field value
pub fn move_toward(grid: &Grid, entities: &[Cell], field: &DistanceField) -> Vec<Cell> {
    entities
        .iter()
        .map(|&cell| {
            let neighbors = grid.four_neighbors(cell.row, cell.col);
            best_neighbor(grid, cell, neighbors, field, |candidate, best| candidate < best)
        })
        .collect()
}

fn best_neighbor<F>(
    grid: &Grid,
    current: Cell,
    neighbors: Vec<Cell>,
    field: &DistanceField,
    improves: F,
) -> Cell
where
    F: Fn(usize, usize) -> bool,
{
    let mut best = current;
    let mut best_distance = field[current];

    for neighbor in neighbors {
        if !grid.is_empty(neighbor.row, neighbor.col) {
            continue;
        }

        let distance = field[neighbor];
        if improves(distance, best_distance) {
            best = neighbor;
            best_distance = distance;
        }
    }

    if best != current {
        trace!(from = %current, to = %best, distance = best_distance, "Entity moved");
    }

    best
}
