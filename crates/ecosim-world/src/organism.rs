//! Organism state and per-kind behavior.

use ecosim_core::{OrganismKind, BASE_INTAKE};
use serde::{Deserialize, Serialize};

/// An organism in the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organism {
    kind: OrganismKind,
    energy: f64,
}

impl Organism {
    pub fn new(kind: OrganismKind, energy: f64) -> Self {
        Self { kind, energy }
    }

    pub fn predator(energy: f64) -> Self {
        Self::new(OrganismKind::Predator, energy)
    }

    pub fn prey(energy: f64) -> Self {
        Self::new(OrganismKind::Prey, energy)
    }

    pub fn kind(&self) -> OrganismKind {
        self.kind
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn set_energy(&mut self, energy: f64) {
        self.energy = energy;
    }

    pub fn add_energy(&mut self, amount: f64) {
        self.energy += amount;
    }

    /// Absorb energy from the environment: the flat base intake plus `bonus`.
    pub fn consume_energy(&mut self, bonus: f64) {
        self.energy += bonus + BASE_INTAKE;
    }

    pub fn should_die(&self) -> bool {
        self.energy <= 0.0
    }

    /// Pay the movement cost. May leave energy at or below zero.
    pub fn pay_movement(&mut self) {
        self.energy -= self.kind.move_cost();
    }

    /// Split off an offspring if energy is above the kind's threshold.
    ///
    /// The parent pays the kind's reproduction cost and the offspring starts
    /// with no energy. Below the threshold nothing changes.
    pub fn try_reproduce(&mut self) -> Option<Organism> {
        if self.energy <= self.kind.reproduction_threshold() {
            return None;
        }
        self.energy -= self.kind.reproduction_cost();
        Some(Organism::new(self.kind, 0.0))
    }

    /// Mark this organism as killed. It is removed by the next death check.
    pub fn kill(&mut self) {
        self.energy = 0.0;
    }
}
