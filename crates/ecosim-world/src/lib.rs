//! World simulation engine.
//!
//! This crate implements the 2D grid where predators and prey move, feed,
//! breed and die, one tick at a time.

pub mod grid;
pub mod organism;
pub mod interaction;
pub mod simulation;
pub mod stats;

pub use grid::{Grid, OrganismId};
pub use interaction::Interaction;
pub use organism::Organism;
pub use simulation::{Simulation, SimulationResult};
pub use stats::{Census, RunTotals, TickStats};
