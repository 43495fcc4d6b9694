//! Configuration types for the simulation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// World configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of grid rows
    pub height: usize,
    /// Number of grid columns
    pub width: usize,
    /// Fraction of cells turned into obstacles by random generation (0.0 to 1.0)
    pub obstacle_density: f32,
    /// Zombies spawned on random empty cells
    pub initial_zombies: usize,
    /// Humans spawned on random empty cells
    pub initial_humans: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            height: 30,
            width: 40,
            obstacle_density: 0.1,
            initial_zombies: 3,
            initial_humans: 10,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        if self.height == 0 || self.width == 0 {
            return Err(Error::Validation(format!(
                "Grid must be non-empty, got {}x{}",
                self.height, self.width
            )));
        }

        if self.height.checked_mul(self.width).is_none() {
            return Err(Error::Validation(format!(
                "Grid {}x{} is too large to address",
                self.height, self.width
            )));
        }

        self.population()?;

        if !(0.0..=1.0).contains(&self.obstacle_density) {
            return Err(Error::Validation(format!(
                "Obstacle density must be within 0.0..=1.0, got {}",
                self.obstacle_density
            )));
        }

        Ok(())
    }

    /// Total entities spawned by random generation
    pub fn population(&self) -> Result<usize> {
        self.initial_zombies
            .checked_add(self.initial_humans)
            .ok_or_else(|| {
                Error::Validation(format!(
                    "Population of {} zombies and {} humans overflows",
                    self.initial_zombies, self.initial_humans
                ))
            })
    }
}

/// Simulation run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of steps to run
    pub num_steps: u64,
    /// Random seed for world generation
    pub seed: u64,
    /// Emit a progress summary every this many steps (0 disables)
    pub log_interval: u64,
    /// World configuration
    pub world: WorldConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_steps: 100,
            seed: 0,
            log_interval: 10,
            world: WorldConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.world.validate()?;
        Ok(config)
    }
}

/// Headless runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Scenario JSON file; defaults are used when absent
    pub scenario_path: Option<String>,
    /// Tracing filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            scenario_path: None,
            log_filter: "info,apocalypse_world=debug".to_string(),
        }
    }
}

impl RunnerConfig {
    /// Defaults overridden by `APOCALYPSE_SCENARIO`
    pub fn from_env() -> Self {
        Self {
            scenario_path: std::env::var("APOCALYPSE_SCENARIO").ok(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let world = WorldConfig::default();
        assert_eq!(world.height, 30);
        assert_eq!(world.width, 40);
        assert!(world.validate().is_ok());

        let sim = SimulationConfig::default();
        assert_eq!(sim.num_steps, 100);
        assert_eq!(sim.world.height, 30);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            SimulationConfig::from_json_str(r#"{"num_steps": 5, "world": {"height": 8}}"#).unwrap();
        assert_eq!(config.num_steps, 5);
        assert_eq!(config.world.height, 8);
        assert_eq!(config.world.width, 40);
        assert_eq!(config.log_interval, 10);
    }

    #[test]
    fn test_invalid_world_rejected() {
        let err = SimulationConfig::from_json_str(r#"{"world": {"width": 0}}"#).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let world = WorldConfig {
            obstacle_density: 1.5,
            ..Default::default()
        };
        assert!(world.validate().is_err());
    }

    #[test]
    fn test_population_overflow_rejected() {
        let world = WorldConfig {
            initial_zombies: usize::MAX,
            initial_humans: 1,
            ..Default::default()
        };
        assert!(matches!(world.population(), Err(Error::Validation(_))));
        assert!(world.validate().is_err());

        assert_eq!(WorldConfig::default().population().unwrap(), 13);

        let json = format!(r#"{{"world": {{"initial_zombies": {}, "initial_humans": 1}}}}"#, usize::MAX);
        assert!(SimulationConfig::from_json_str(&json).is_err());
    }

    #[test]
    fn test_simulation_config_serialization() {
        let config = SimulationConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.seed, deserialized.seed);
        assert_eq!(config.world.obstacle_density, deserialized.world.obstacle_density);
    }
}
