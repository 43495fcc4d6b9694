//! Multi-source breadth-first distance fields.

use crate::grid::Grid;
use crate::queue::Queue;
use apocalypse_core::Cell;
use serde::{Deserialize, Serialize};
use std::ops::Index;
use tracing::trace;

/// Dense per-cell hop counts to the nearest source.
///
/// Cells with no 4-way path through empty cells to any source, obstacles
/// included, hold the sentinel `height * width`, which exceeds every real
/// distance on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceField {
    height: usize,
    width: usize,
    distances: Vec<usize>,
}

impl DistanceField {
    /// Run a breadth-first search seeded from every cell in `sources`.
    ///
    /// Duplicate sources are seeded once. The search only expands into empty
    /// cells, using 4-way connectivity.
    pub fn compute(grid: &Grid, sources: &[Cell]) -> Self {
        let (height, width) = grid.dimensions();
        let sentinel = height * width;
        let mut distances = vec![sentinel; sentinel];
        let mut visited = vec![false; sentinel];
        let mut frontier = Queue::with_capacity(sources.len());

        for &source in sources {
            assert!(grid.contains(source), "source {} out of bounds", source);
            let index = source.row * width + source.col;
            if !visited[index] {
                visited[index] = true;
                distances[index] = 0;
                frontier.push(source);
            }
        }

        while let Some(current) = frontier.pop() {
            let next_distance = distances[current.row * width + current.col] + 1;

            for neighbor in grid.four_neighbors(current.row, current.col) {
                let index = neighbor.row * width + neighbor.col;
                if !visited[index] && grid.is_empty(neighbor.row, neighbor.col) {
                    visited[index] = true;
                    distances[index] = next_distance;
                    frontier.push(neighbor);
                }
            }
        }

        trace!(
            sources = sources.len(),
            reached = visited.iter().filter(|v| **v).count(),
            "Distance field computed"
        );

        Self {
            height,
            width,
            distances,
        }
    }

    /// (height, width)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Value stored for cells with no path to a source
    pub fn sentinel(&self) -> usize {
        self.height * self.width
    }

    pub fn get(&self, cell: Cell) -> Option<usize> {
        (cell.row < self.height && cell.col < self.width)
            .then(|| self.distances[cell.row * self.width + cell.col])
    }

    pub fn is_reachable(&self, cell: Cell) -> bool {
        self[cell] < self.sentinel()
    }

    /// Row slices, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.distances.chunks(self.width.max(1))
    }
}

impl Index<Cell> for DistanceField {
    type Output = usize;

    fn index(&self, cell: Cell) -> &usize {
        assert!(
            cell.row < self.height && cell.col < self.width,
            "cell {} out of bounds for {}x{} distance field",
            cell,
            self.height,
            self.width
        );
        &self.distances[cell.row * self.width + cell.col]
    }
}
