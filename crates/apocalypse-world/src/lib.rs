//! Pursuit-evasion world simulation.
//!
//! Zombies chase humans and humans flee zombies on a 2D grid with obstacles.
//! Each step computes a breadth-first distance field from one population and
//! moves the other population greedily against it.

pub mod grid;
pub mod queue;
pub mod field;
pub mod movement;
pub mod apocalypse;
pub mod scenario;

pub use grid::Grid;
pub use queue::Queue;
pub use field::DistanceField;
pub use apocalypse::{Apocalypse, StepSummary};
pub use scenario::{Scenario, ScenarioResult};
