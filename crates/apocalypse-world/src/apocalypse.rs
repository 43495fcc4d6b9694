//! Simulation state: the grid plus the zombie and human populations.

use crate::field::DistanceField;
use crate::grid::Grid;
use crate::movement::{move_away, move_toward};
use apocalypse_core::{Cell, Error, Result, Species, WorldConfig};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// Zombies chasing humans across a grid with obstacles
#[derive(Debug, Clone)]
pub struct Apocalypse {
    grid: Grid,
    zombies: Vec<Cell>,
    humans: Vec<Cell>,
    step: u64,
}

/// Population snapshot taken at the end of a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSummary {
    pub step: u64,
    pub zombies: usize,
    pub humans: usize,
    /// Humans sharing a cell with at least one zombie
    pub humans_caught: usize,
    /// Shortest path from any zombie to any human, if one exists
    pub nearest_distance: Option<usize>,
    /// Entities of either species that changed cell during the step
    pub moved: usize,
}

impl Apocalypse {
    /// Create an empty simulation of the given size
    pub fn new(height: usize, width: usize) -> Result<Self> {
        if height == 0 || width == 0 || height.checked_mul(width).is_none() {
            return Err(Error::Validation(format!(
                "Grid must be non-empty and addressable, got {}x{}",
                height, width
            )));
        }

        Ok(Self {
            grid: Grid::new(height, width),
            zombies: Vec::new(),
            humans: Vec::new(),
            step: 0,
        })
    }

    /// Create a simulation with the given obstacles and populations.
    ///
    /// Obstacles are placed first; every entity must then land on an empty,
    /// in-bounds cell.
    pub fn with_entities(
        height: usize,
        width: usize,
        obstacles: &[Cell],
        zombies: &[Cell],
        humans: &[Cell],
    ) -> Result<Self> {
        let mut apocalypse = Self::new(height, width)?;

        for &cell in obstacles {
            apocalypse.check_in_bounds(cell)?;
            apocalypse.grid.set_obstacle(cell.row, cell.col);
        }
        for &cell in zombies {
            apocalypse.add_zombie(cell.row, cell.col)?;
        }
        for &cell in humans {
            apocalypse.add_human(cell.row, cell.col)?;
        }

        Ok(apocalypse)
    }

    /// Generate a random world: obstacles by density, then each population
    /// on distinct random empty cells
    pub fn from_config(config: &WorldConfig, rng: &mut ChaCha8Rng) -> Result<Self> {
        config.validate()?;

        let grid = Grid::from_config(config, rng);
        let mut free: Vec<Cell> = grid
            .cells()
            .filter(|cell| grid.is_empty(cell.row, cell.col))
            .collect();

        let wanted = config.population()?;
        if wanted > free.len() {
            return Err(Error::Validation(format!(
                "Cannot place {} entities on {} empty cells",
                wanted,
                free.len()
            )));
        }

        let mut take = |count: usize| -> Vec<Cell> {
            (0..count)
                .map(|_| {
                    let index = rng.gen_range(0..free.len());
                    free.swap_remove(index)
                })
                .collect()
        };
        let zombies = take(config.initial_zombies);
        let humans = take(config.initial_humans);

        info!(
            height = config.height,
            width = config.width,
            obstacles = grid.obstacle_count(),
            zombies = zombies.len(),
            humans = humans.len(),
            "Generated random world"
        );

        Ok(Self {
            grid,
            zombies,
            humans,
            step: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Steps taken since construction or the last `clear`
    pub fn steps_taken(&self) -> u64 {
        self.step
    }

    /// Empty every cell and remove both populations
    pub fn clear(&mut self) {
        self.grid.clear();
        self.zombies.clear();
        self.humans.clear();
        self.step = 0;
    }

    pub fn add_zombie(&mut self, row: usize, col: usize) -> Result<()> {
        let cell = Cell::new(row, col);
        self.check_placeable(cell)?;
        self.zombies.push(cell);
        Ok(())
    }

    pub fn add_human(&mut self, row: usize, col: usize) -> Result<()> {
        let cell = Cell::new(row, col);
        self.check_placeable(cell)?;
        self.humans.push(cell);
        Ok(())
    }

    pub fn num_zombies(&self) -> usize {
        self.zombies.len()
    }

    pub fn num_humans(&self) -> usize {
        self.humans.len()
    }

    /// Zombie positions in insertion order, as of this call
    pub fn zombies(&self) -> impl Iterator<Item = Cell> {
        self.zombies.clone().into_iter()
    }

    /// Human positions in insertion order, as of this call
    pub fn humans(&self) -> impl Iterator<Item = Cell> {
        self.humans.clone().into_iter()
    }

    /// Turn an empty, unoccupied cell into an obstacle
    pub fn set_obstacle(&mut self, row: usize, col: usize) -> Result<()> {
        let cell = Cell::new(row, col);
        self.check_in_bounds(cell)?;
        if self.zombies.contains(&cell) || self.humans.contains(&cell) {
            return Err(Error::Occupied { row, col });
        }
        self.grid.set_obstacle(row, col);
        Ok(())
    }

    pub fn clear_obstacle(&mut self, row: usize, col: usize) -> Result<()> {
        self.check_in_bounds(Cell::new(row, col))?;
        self.grid.clear_cell(row, col);
        Ok(())
    }

    /// Shortest 4-way distances from every member of `species`
    pub fn compute_distance_field(&self, species: Species) -> DistanceField {
        let sources = match species {
            Species::Zombie => &self.zombies,
            Species::Human => &self.humans,
        };

        let field = DistanceField::compute(&self.grid, sources);
        debug!(species = %species, sources = sources.len(), "Computed distance field");
        field
    }

    /// Move every human away from zombies using a zombie-seeded field
    pub fn move_humans(&mut self, zombie_field: &DistanceField) -> Result<()> {
        self.relocate(Species::Human, zombie_field).map(|_| ())
    }

    /// Move every zombie toward humans using a human-seeded field
    pub fn move_zombies(&mut self, human_field: &DistanceField) -> Result<()> {
        self.relocate(Species::Zombie, human_field).map(|_| ())
    }

    /// Humans flee the current zombies, then zombies chase the moved humans
    pub fn step(&mut self) -> Result<StepSummary> {
        let zombie_field = self.compute_distance_field(Species::Zombie);
        let mut moved = self.relocate(Species::Zombie.opponent(), &zombie_field)?;

        let human_field = self.compute_distance_field(Species::Human);
        moved += self.relocate(Species::Human.opponent(), &human_field)?;

        self.step += 1;
        Ok(self.summarize(&human_field, moved))
    }

    /// Run up to `num_steps` steps, logging a summary every `log_interval` steps.
    ///
    /// Stops early once a step moves no entity, since every later step would
    /// repeat it. Returns the last summary, or `None` when no step ran.
    #[instrument(skip(self), fields(zombies = self.zombies.len(), humans = self.humans.len()))]
    pub fn run(&mut self, num_steps: u64, log_interval: u64) -> Result<Option<StepSummary>> {
        info!("Starting simulation for {} steps", num_steps);

        let mut last = None;
        for _ in 0..num_steps {
            let summary = self.step()?;

            if log_interval > 0 && summary.step % log_interval == 0 {
                info!(
                    step = summary.step,
                    humans_caught = summary.humans_caught,
                    nearest_distance = ?summary.nearest_distance,
                    "Step {}/{}",
                    summary.step,
                    num_steps
                );
            }

            let settled = summary.moved == 0;
            last = Some(summary);
            if settled {
                debug!(step = self.step, "No entity moved, simulation settled");
                break;
            }
        }

        info!(
            event = "simulation_complete",
            steps = self.step,
            humans_caught = last.as_ref().map_or(0, |s: &StepSummary| s.humans_caught),
            "Simulation complete"
        );

        Ok(last)
    }

    /// Replace the positions of `movers` with their next move against `field`
    fn relocate(&mut self, movers: Species, field: &DistanceField) -> Result<usize> {
        self.check_field(field)?;

        let (positions, next) = match movers {
            Species::Human => {
                let next = move_away(&self.grid, &self.humans, field);
                (&mut self.humans, next)
            }
            Species::Zombie => {
                let next = move_toward(&self.grid, &self.zombies, field);
                (&mut self.zombies, next)
            }
        };

        let moved = count_moved(positions.as_slice(), &next);
        *positions = next;
        debug!(species = %movers, moved, total = positions.len(), "Entities moved");
        Ok(moved)
    }

    /// `human_field` must be seeded from the current human positions
    fn summarize(&self, human_field: &DistanceField, moved: usize) -> StepSummary {
        let zombie_cells: HashSet<Cell> = self.zombies.iter().copied().collect();
        let humans_caught = self
            .humans
            .iter()
            .filter(|human| zombie_cells.contains(human))
            .count();
        let nearest_distance = self
            .zombies
            .iter()
            .map(|&zombie| human_field[zombie])
            .filter(|&distance| distance < human_field.sentinel())
            .min();

        StepSummary {
            step: self.step,
            zombies: self.zombies.len(),
            humans: self.humans.len(),
            humans_caught,
            nearest_distance,
            moved,
        }
    }

    fn check_in_bounds(&self, cell: Cell) -> Result<()> {
        if self.grid.contains(cell) {
            Ok(())
        } else {
            let (height, width) = self.grid.dimensions();
            Err(Error::OutOfBounds {
                row: cell.row,
                col: cell.col,
                height,
                width,
            })
        }
    }

    fn check_placeable(&self, cell: Cell) -> Result<()> {
        self.check_in_bounds(cell)?;
        if !self.grid.is_empty(cell.row, cell.col) {
            return Err(Error::Blocked {
                row: cell.row,
                col: cell.col,
            });
        }
        Ok(())
    }

    fn check_field(&self, field: &DistanceField) -> Result<()> {
        if field.dimensions() != self.grid.dimensions() {
            return Err(Error::DimensionMismatch {
                expected: self.grid.dimensions(),
                found: field.dimensions(),
            });
        }
        Ok(())
    }
}

fn count_moved(before: &[Cell], after: &[Cell]) -> usize {
    before.iter().zip(after).filter(|(a, b)| a != b).count()
}
