//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Flat energy absorbed on every intake, on top of the situational bonus.
pub const BASE_INTAKE: f64 = 10.0;

/// Energy a predator gains from killing a prey.
pub const PREDATION_GAIN: f64 = 17.0;

/// 2D position in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Apply toroidal wrapping for given world dimensions
    pub fn wrap(&self, width: i32, height: i32) -> Self {
        Self {
            x: ((self.x % width) + width) % width,
            y: ((self.y % height) + height) % height,
        }
    }
}

/// Adjacency used when drawing a random neighbor of a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Neighborhood {
    /// 4-connected: north, south, east, west.
    VonNeumann,
    /// 8-connected: the four orthogonal cells plus the diagonals.
    #[default]
    Moore,
}

impl Neighborhood {
    pub fn offsets(&self) -> &'static [(i32, i32)] {
        const VON_NEUMANN: [(i32, i32); 4] = [(0, -1), (0, 1), (1, 0), (-1, 0)];
        const MOORE: [(i32, i32); 8] = [
            (0, -1),
            (0, 1),
            (1, 0),
            (-1, 0),
            (1, -1),
            (-1, -1),
            (1, 1),
            (-1, 1),
        ];

        match self {
            Neighborhood::VonNeumann => &VON_NEUMANN,
            Neighborhood::Moore => &MOORE,
        }
    }
}

/// The fixed biological role of an organism.
///
/// Every per-kind rule constant lives here so that behavior is a `match` on the
/// kind rather than an open set of implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganismKind {
    Predator,
    Prey,
}

impl OrganismKind {
    /// Energy that must be strictly exceeded before reproducing.
    pub fn reproduction_threshold(&self) -> f64 {
        match self {
            OrganismKind::Predator => 50.0,
            OrganismKind::Prey => 20.0,
        }
    }

    /// Energy the parent pays for each offspring.
    pub fn reproduction_cost(&self) -> f64 {
        match self {
            OrganismKind::Predator => 25.0,
            OrganismKind::Prey => 11.0,
        }
    }

    /// Energy deducted every time the organism moves.
    pub fn move_cost(&self) -> f64 {
        match self {
            OrganismKind::Predator => 0.6,
            OrganismKind::Prey => 0.2,
        }
    }

    /// Whether an organism of this kind eats one of `other`.
    pub fn preys_on(&self, other: OrganismKind) -> bool {
        matches!((self, other), (OrganismKind::Predator, OrganismKind::Prey))
    }

    pub fn all() -> [OrganismKind; 2] {
        [OrganismKind::Predator, OrganismKind::Prey]
    }
}

impl fmt::Display for OrganismKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrganismKind::Predator => write!(f, "predator"),
            OrganismKind::Prey => write!(f, "prey"),
        }
    }
}

/// Read-only view of one cell, for renderers and reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CellView {
    Empty,
    Occupied { kind: OrganismKind, energy: f64 },
}

impl CellView {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellView::Empty)
    }

    pub fn kind(&self) -> Option<OrganismKind> {
        match self {
            CellView::Empty => None,
            CellView::Occupied { kind, .. } => Some(*kind),
        }
    }
}
