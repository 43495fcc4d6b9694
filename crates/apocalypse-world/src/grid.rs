//! 2D occupancy grid for the world.

use apocalypse_core::{Cell, Direction, Occupancy, WorldConfig};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// A bounded grid of empty and obstacle cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<Occupancy>,
}

impl Grid {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            cells: vec![Occupancy::Empty; height * width],
        }
    }

    /// Create a grid with obstacles scattered according to `config.obstacle_density`
    pub fn from_config(config: &WorldConfig, rng: &mut ChaCha8Rng) -> Self {
        let mut grid = Self::new(config.height, config.width);

        for occupancy in grid.cells.iter_mut() {
            if rng.gen::<f32>() < config.obstacle_density {
                *occupancy = Occupancy::Obstacle;
            }
        }

        grid
    }

    /// (height, width)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    pub fn occupancy(&self, cell: Cell) -> Occupancy {
        self.cells[self.cell_to_index(cell)]
    }

    pub fn set_obstacle(&mut self, row: usize, col: usize) {
        let index = self.cell_to_index(Cell::new(row, col));
        self.cells[index] = Occupancy::Obstacle;
    }

    pub fn clear_cell(&mut self, row: usize, col: usize) {
        let index = self.cell_to_index(Cell::new(row, col));
        self.cells[index] = Occupancy::Empty;
    }

    /// Set every cell back to empty
    pub fn clear(&mut self) {
        self.cells.fill(Occupancy::Empty);
    }

    pub fn is_empty(&self, row: usize, col: usize) -> bool {
        self.occupancy(Cell::new(row, col)) == Occupancy::Empty
    }

    /// In-bounds orthogonal neighbors in up, down, left, right order
    pub fn four_neighbors(&self, row: usize, col: usize) -> Vec<Cell> {
        self.neighbors(Cell::new(row, col), &Direction::ORTHOGONAL)
    }

    /// In-bounds neighbors: orthogonals first, then up-left, up-right,
    /// down-left, down-right
    pub fn eight_neighbors(&self, row: usize, col: usize) -> Vec<Cell> {
        self.neighbors(Cell::new(row, col), &Direction::ALL)
    }

    fn neighbors(&self, cell: Cell, directions: &[Direction]) -> Vec<Cell> {
        assert!(
            self.contains(cell),
            "cell {} out of bounds for {}x{} grid",
            cell,
            self.height,
            self.width
        );

        directions
            .iter()
            .filter_map(|&direction| cell.step(direction, self.height, self.width))
            .collect()
    }

    /// Iterator over all obstacle cells in row-major order
    pub fn obstacles(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, occupancy)| **occupancy == Occupancy::Obstacle)
            .map(move |(i, _)| self.index_to_cell(i))
    }

    pub fn obstacle_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|occupancy| **occupancy == Occupancy::Obstacle)
            .count()
    }

    /// Iterator over all cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.cells.len()).map(move |i| self.index_to_cell(i))
    }

    fn cell_to_index(&self, cell: Cell) -> usize {
        assert!(
            self.contains(cell),
            "cell {} out of bounds for {}x{} grid",
            cell,
            self.height,
            self.width
        );
        cell.row * self.width + cell.col
    }

    fn index_to_cell(&self, index: usize) -> Cell {
        Cell::new(index / self.width, index % self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(4, 6);
        assert_eq!(grid.dimensions(), (4, 6));
        assert_eq!(grid.cells.len(), 24);
        assert!(grid.cells().all(|cell| grid.is_empty(cell.row, cell.col)));
    }

    #[test]
    fn test_set_and_clear_obstacle() {
        let mut grid = Grid::new(3, 3);
        grid.set_obstacle(1, 2);
        assert!(!grid.is_empty(1, 2));
        assert_eq!(grid.occupancy(Cell::new(1, 2)), Occupancy::Obstacle);
        assert_eq!(grid.obstacles().collect::<Vec<_>>(), vec![Cell::new(1, 2)]);

        grid.clear_cell(1, 2);
        assert!(grid.is_empty(1, 2));
        assert_eq!(grid.obstacle_count(), 0);
    }

    #[test]
    fn test_clear() {
        let mut grid = Grid::new(3, 3);
        grid.set_obstacle(0, 0);
        grid.set_obstacle(2, 2);
        grid.clear();
        assert_eq!(grid.obstacle_count(), 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_out_of_bounds_panics() {
        let grid = Grid::new(3, 3);
        grid.is_empty(3, 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_neighbors_of_out_of_bounds_cell_panics() {
        let grid = Grid::new(3, 3);
        grid.four_neighbors(0, 5);
    }

    #[test]
    fn test_four_neighbors_order() {
        let grid = Grid::new(3, 3);
        assert_eq!(
            grid.four_neighbors(1, 1),
            vec![
                Cell::new(0, 1),
                Cell::new(2, 1),
                Cell::new(1, 0),
                Cell::new(1, 2),
            ]
        );
    }

    #[test]
    fn test_neighbors_clipped_at_corners() {
        let grid = Grid::new(3, 3);
        assert_eq!(grid.four_neighbors(0, 0), vec![Cell::new(1, 0), Cell::new(0, 1)]);
        assert_eq!(
            grid.eight_neighbors(0, 0),
            vec![Cell::new(1, 0), Cell::new(0, 1), Cell::new(1, 1)]
        );
        assert_eq!(grid.eight_neighbors(2, 2).len(), 3);
        assert_eq!(grid.four_neighbors(0, 1).len(), 3);
        assert_eq!(grid.eight_neighbors(0, 1).len(), 5);
    }

    #[test]
    fn test_eight_neighbors_order() {
        let grid = Grid::new(3, 3);
        assert_eq!(
            grid.eight_neighbors(1, 1),
            vec![
                Cell::new(0, 1),
                Cell::new(2, 1),
                Cell::new(1, 0),
                Cell::new(1, 2),
                Cell::new(0, 0),
                Cell::new(0, 2),
                Cell::new(2, 0),
                Cell::new(2, 2),
            ]
        );
    }

    #[test]
    fn test_single_cell_grid_has_no_neighbors() {
        let grid = Grid::new(1, 1);
        assert!(grid.four_neighbors(0, 0).is_empty());
        assert!(grid.eight_neighbors(0, 0).is_empty());
    }

    #[test]
    fn test_grid_from_config() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let config = WorldConfig {
            height: 20,
            width: 20,
            obstacle_density: 0.2,
            ..Default::default()
        };

        let grid = Grid::from_config(&config, &mut rng);
        assert_eq!(grid.dimensions(), (20, 20));
        assert!(grid.obstacle_count() > 0);
        assert!(grid.obstacle_count() < 400);

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(Grid::from_config(&config, &mut rng), grid);
    }

    #[test]
    fn test_zero_density_has_no_obstacles() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let config = WorldConfig {
            obstacle_density: 0.0,
            ..Default::default()
        };
        assert_eq!(Grid::from_config(&config, &mut rng).obstacle_count(), 0);
    }
}
