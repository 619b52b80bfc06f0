//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::types::{Neighborhood, OrganismKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// World configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the world grid
    pub width: i32,
    /// Height of the world grid
    pub height: i32,
    /// Which cells count as neighbors (both variants wrap at the edges)
    pub neighborhood: Neighborhood,
}

impl WorldConfig {
    /// Total number of cells
    pub fn size(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            neighborhood: Neighborhood::Moore,
        }
    }
}

/// Environmental intake per kind.
///
/// `None` means the kind is skipped in the intake pass entirely; `Some(bonus)`
/// grants `bonus` plus the flat base intake.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
    /// Intake bonus for predators (they live mostly off predation)
    pub predator_intake: Option<f64>,
    /// Intake bonus for prey (passive grazing)
    pub prey_intake: Option<f64>,
}

impl EnergyConfig {
    pub fn intake_for(&self, kind: OrganismKind) -> Option<f64> {
        match kind {
            OrganismKind::Predator => self.predator_intake,
            OrganismKind::Prey => self.prey_intake,
        }
    }
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            predator_intake: Some(0.001),
            prey_intake: Some(10.0),
        }
    }
}

/// An organism placed before the first tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedOrganism {
    pub kind: OrganismKind,
    /// Linear cell index (`y * width + x`)
    pub index: usize,
    pub energy: f64,
}

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Number of ticks `run` advances
    pub num_ticks: u64,
    /// Ticks between population reports (0 disables them)
    pub report_interval: u64,
    /// World configuration
    pub world: WorldConfig,
    /// Energy configuration
    pub energy: EnergyConfig,
    /// Organisms present at tick 0
    pub initial_population: Vec<SeedOrganism>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 5,
            num_ticks: 1_000,
            report_interval: 100,
            world: WorldConfig::default(),
            energy: EnergyConfig::default(),
            initial_population: vec![
                SeedOrganism {
                    kind: OrganismKind::Predator,
                    index: 100,
                    energy: 2.5,
                },
                SeedOrganism {
                    kind: OrganismKind::Prey,
                    index: 10,
                    energy: 2.5,
                },
            ],
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check that the configuration describes a world that can be built
    pub fn validate(&self) -> Result<()> {
        if self.world.width <= 0 || self.world.height <= 0 {
            return Err(Error::Validation(format!(
                "world dimensions must be positive, got {}x{}",
                self.world.width, self.world.height
            )));
        }

        // Cell indices are mapped to positions in i32 arithmetic.
        let cells = self.world.width as i64 * self.world.height as i64;
        if cells > i32::MAX as i64 {
            return Err(Error::Validation(format!(
                "world of {}x{} has {} cells, more than the supported {}",
                self.world.width,
                self.world.height,
                cells,
                i32::MAX
            )));
        }

        for (kind, intake) in OrganismKind::all()
            .into_iter()
            .map(|kind| (kind, self.energy.intake_for(kind)))
        {
            if let Some(bonus) = intake {
                if !bonus.is_finite() {
                    return Err(Error::Validation(format!(
                        "{kind} intake bonus must be finite, got {bonus}"
                    )));
                }
            }
        }

        let size = self.world.size();
        let mut taken = HashSet::new();
        for seed in &self.initial_population {
            if seed.index >= size {
                return Err(Error::OutOfBounds {
                    index: seed.index,
                    size,
                });
            }
            if !taken.insert(seed.index) {
                return Err(Error::CellOccupied(seed.index));
            }
            if !seed.energy.is_finite() {
                return Err(Error::Validation(format!(
                    "seed {} at cell {} has non-finite energy",
                    seed.kind, seed.index
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let world_config = WorldConfig::default();
        assert_eq!(world_config.width, 100);
        assert_eq!(world_config.height, 100);
        assert_eq!(world_config.size(), 10_000);

        let energy_config = EnergyConfig::default();
        assert_eq!(energy_config.intake_for(OrganismKind::Prey), Some(10.0));
        assert_eq!(energy_config.intake_for(OrganismKind::Predator), Some(0.001));

        let config = SimConfig::default();
        assert_eq!(config.seed, 5);
        assert_eq!(config.initial_population.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        let mut config = SimConfig::default();
        config.world.width = 0;
        assert!(matches!(config.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_rejects_oversized_grid() {
        let mut config = SimConfig::default();
        config.world.width = 50_000;
        config.world.height = 50_000;
        config.initial_population.clear();
        assert!(matches!(config.validate(), Err(Error::Validation(_))));

        config.world.width = 46_340;
        config.world.height = 46_340;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_bounds_seed() {
        let mut config = SimConfig::default();
        config.world.width = 5;
        config.world.height = 5;
        assert!(matches!(
            config.validate(),
            Err(Error::OutOfBounds { index: 100, size: 25 })
        ));
    }

    #[test]
    fn test_rejects_duplicate_seed_cells() {
        let mut config = SimConfig::default();
        config.initial_population[1].index = 100;
        assert!(matches!(config.validate(), Err(Error::CellOccupied(100))));
    }

    #[test]
    fn test_rejects_non_finite_energy() {
        let mut config = SimConfig::default();
        config.initial_population[0].energy = f64::NAN;
        assert!(matches!(config.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = SimConfig::from_json_str(
            r#"{ "seed": 42, "world": { "width": 20, "neighborhood": "von_neumann" } }"#,
        )
        .unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.world.width, 20);
        assert_eq!(config.world.height, 100);
        assert_eq!(config.world.neighborhood, Neighborhood::VonNeumann);
        assert_eq!(config.energy.prey_intake, Some(10.0));
    }

    #[test]
    fn test_disabled_intake_round_trips_as_null() {
        let config =
            SimConfig::from_json_str(r#"{ "energy": { "predator_intake": null } }"#).unwrap();
        assert_eq!(config.energy.predator_intake, None);
        assert_eq!(config.energy.prey_intake, Some(10.0));
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        assert!(matches!(
            SimConfig::from_json_str("{ not json"),
            Err(Error::Serialization(_))
        ));
    }
}
