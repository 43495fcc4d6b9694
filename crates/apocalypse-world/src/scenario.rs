//! Serializable scenario wrapper for headless runs.

use crate::apocalypse::{Apocalypse, StepSummary};
use apocalypse_core::{Cell, Result, SimulationConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// A scenario that can be built and executed by a driver.
///
/// When `obstacles`, `zombies` and `humans` are all empty the world is
/// generated from `config.world` and `config.seed` instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub config: SimulationConfig,
    pub obstacles: Vec<Cell>,
    pub zombies: Vec<Cell>,
    pub humans: Vec<Cell>,
}

impl Scenario {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.config.world.validate()?;
        Ok(scenario)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn is_generated(&self) -> bool {
        self.obstacles.is_empty() && self.zombies.is_empty() && self.humans.is_empty()
    }

    pub fn build(&self) -> Result<Apocalypse> {
        let world = &self.config.world;

        if self.is_generated() {
            let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
            Apocalypse::from_config(world, &mut rng)
        } else {
            Apocalypse::with_entities(
                world.height,
                world.width,
                &self.obstacles,
                &self.zombies,
                &self.humans,
            )
        }
    }

    /// Build the world and run it for `config.num_steps` steps
    pub fn execute(&self) -> Result<ScenarioResult> {
        let mut apocalypse = self.build()?;
        let last_summary = apocalypse.run(self.config.num_steps, self.config.log_interval)?;

        info!(
            steps = apocalypse.steps_taken(),
            zombies = apocalypse.num_zombies(),
            humans = apocalypse.num_humans(),
            "Scenario executed"
        );

        Ok(ScenarioResult {
            steps: apocalypse.steps_taken(),
            obstacles: apocalypse.grid().obstacles().collect(),
            zombies: apocalypse.zombies().collect(),
            humans: apocalypse.humans().collect(),
            last_summary,
        })
    }
}

/// Final state of an executed scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Steps actually run; fewer than requested if the world settled
    pub steps: u64,
    pub obstacles: Vec<Cell>,
    pub zombies: Vec<Cell>,
    pub humans: Vec<Cell>,
    pub last_summary: Option<StepSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use apocalypse_core::{Error, WorldConfig};

    fn corridor() -> Scenario {
        Scenario {
            config: SimulationConfig {
                num_steps: 4,
                seed: 0,
                log_interval: 0,
                world: WorldConfig {
                    height: 1,
                    width: 6,
                    ..Default::default()
                },
            },
            obstacles: vec![],
            zombies: vec![Cell::new(0, 0)],
            humans: vec![Cell::new(0, 5)],
        }
    }

    #[test]
    fn test_execute_explicit_scenario() {
        let result = corridor().execute().unwrap();

        assert_eq!(result.steps, 4);
        assert_eq!(result.humans, vec![Cell::new(0, 5)]);
        assert_eq!(result.zombies, vec![Cell::new(0, 4)]);
        assert_eq!(result.last_summary.unwrap().nearest_distance, Some(1));
    }

    #[test]
    fn test_generated_scenario_is_reproducible() {
        let scenario = Scenario {
            config: SimulationConfig {
                num_steps: 5,
                seed: 99,
                log_interval: 0,
                world: WorldConfig {
                    height: 15,
                    width: 15,
                    ..Default::default()
                },
            },
            ..Default::default()
        };
        assert!(scenario.is_generated());

        let first = scenario.execute().unwrap();
        let second = scenario.execute().unwrap();
        assert_eq!(first.zombies, second.zombies);
        assert_eq!(first.humans, second.humans);
        assert_eq!(first.obstacles, second.obstacles);
        assert_eq!(first.last_summary, second.last_summary);
    }

    #[test]
    fn test_scenario_from_json() {
        let json = r#"{
            "config": {"num_steps": 2, "world": {"height": 3, "width": 3}},
            "obstacles": [{"row": 1, "col": 1}],
            "zombies": [{"row": 0, "col": 0}],
            "humans": [{"row": 2, "col": 2}]
        }"#;
        let scenario = Scenario::from_json_str(json).unwrap();
        assert!(!scenario.is_generated());

        let apocalypse = scenario.build().unwrap();
        assert!(!apocalypse.grid().is_empty(1, 1));
        assert_eq!(apocalypse.num_zombies(), 1);
    }

    #[test]
    fn test_invalid_scenarios() {
        assert!(matches!(
            Scenario::from_json_str("{"),
            Err(Error::Serialization(_))
        ));

        let mut scenario = corridor();
        scenario.obstacles.push(Cell::new(0, 0));
        assert!(matches!(scenario.build(), Err(Error::Blocked { .. })));

        assert!(matches!(
            Scenario::from_json_file("/nonexistent/scenario.json"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_huge_step_count_settles() {
        let json = format!(
            r#"{{
                "config": {{"num_steps": {}, "log_interval": 0, "world": {{"height": 1, "width": 1}}}},
                "humans": [{{"row": 0, "col": 0}}]
            }}"#,
            u64::MAX
        );
        let result = Scenario::from_json_str(&json).unwrap().execute().unwrap();

        assert_eq!(result.steps, 1);
        assert_eq!(result.humans, vec![Cell::new(0, 0)]);
        assert_eq!(result.last_summary.unwrap().moved, 0);
    }

    #[test]
    fn test_generated_population_overflow_rejected() {
        let json = format!(
            r#"{{"config": {{"world": {{"initial_zombies": {}, "initial_humans": 1}}}}}}"#,
            usize::MAX
        );
        assert!(matches!(
            Scenario::from_json_str(&json),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_result_serialization() {
        let result = corridor().execute().unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let back: ScenarioResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.zombies, result.zombies);
        assert_eq!(back.last_summary, result.last_summary);
    }
}
