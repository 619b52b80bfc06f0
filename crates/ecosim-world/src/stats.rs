//! Population and event counters.

use crate::grid::Grid;
use ecosim_core::OrganismKind;
use serde::{Deserialize, Serialize};

/// Events observed during a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickStats {
    /// Offspring placed on the grid
    pub births: u32,
    /// Offspring discarded because their target cell was taken
    pub lost_offspring: u32,
    /// Prey killed by a predator moving onto them
    pub predations: u32,
    /// Prey that walked into a predator
    pub fatal_encounters: u32,
    /// Organisms removed for running out of energy
    pub starvations: u32,
}

impl TickStats {
    pub fn deaths(&self) -> u32 {
        self.predations + self.fatal_encounters + self.starvations
    }
}

/// Running totals across a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    pub births: u64,
    pub lost_offspring: u64,
    pub predations: u64,
    pub fatal_encounters: u64,
    pub starvations: u64,
}

impl RunTotals {
    pub fn record(&mut self, tick: &TickStats) {
        self.births += tick.births as u64;
        self.lost_offspring += tick.lost_offspring as u64;
        self.predations += tick.predations as u64;
        self.fatal_encounters += tick.fatal_encounters as u64;
        self.starvations += tick.starvations as u64;
    }
}

/// Snapshot of who is alive
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Census {
    pub predators: usize,
    pub prey: usize,
    pub empty: usize,
    pub mean_predator_energy: f64,
    pub mean_prey_energy: f64,
}

impl Census {
    pub fn take(grid: &Grid) -> Self {
        let mut predators = 0;
        let mut prey = 0;
        let mut predator_energy = 0.0;
        let mut prey_energy = 0.0;

        for (_, organism) in grid.iter() {
            match organism.kind() {
                OrganismKind::Predator => {
                    predators += 1;
                    predator_energy += organism.energy();
                }
                OrganismKind::Prey => {
                    prey += 1;
                    prey_energy += organism.energy();
                }
            }
        }

        let mean = |total: f64, count: usize| {
            if count > 0 {
                total / count as f64
            } else {
                0.0
            }
        };

        Self {
            predators,
            prey,
            empty: grid.size() - predators - prey,
            mean_predator_energy: mean(predator_energy, predators),
            mean_prey_energy: mean(prey_energy, prey),
        }
    }

    pub fn population(&self) -> usize {
        self.predators + self.prey
    }

    pub fn count(&self, kind: OrganismKind) -> usize {
        match kind {
            OrganismKind::Predator => self.predators,
            OrganismKind::Prey => self.prey,
        }
    }
}
