//! What happens when an organism tries to step into a cell.

use crate::grid::Grid;
use ecosim_core::{OrganismKind, PREDATION_GAIN};
use serde::{Deserialize, Serialize};

/// Outcome of one organism targeting one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interaction {
    /// The target was empty and the actor moved in.
    Move,
    /// The actor killed the target's occupant and took its cell.
    Predation,
    /// The actor ran into something that eats it and died where it stood.
    Eaten,
    /// Same-kind collision. Nobody moves and no energy changes hands.
    Blocked,
}

impl Interaction {
    /// Whether the actor ends up in the target cell
    pub fn relocates(&self) -> bool {
        matches!(self, Interaction::Move | Interaction::Predation)
    }
}

/// Decide the interaction between an actor and whatever occupies its target
pub fn resolve(actor: OrganismKind, target: Option<OrganismKind>) -> Interaction {
    match target {
        None => Interaction::Move,
        Some(target) if actor.preys_on(target) => Interaction::Predation,
        Some(target) if target.preys_on(actor) => Interaction::Eaten,
        Some(_) => Interaction::Blocked,
    }
}

/// Resolve and apply the interaction of the organism at `from` with cell `to`.
///
/// Returns `None` when `from` is empty. A killed prey is released as soon as the
/// predator moves onto it; an actor that gets eaten is left in place with no
/// energy for the caller's death check to remove.
pub fn interact_at(grid: &mut Grid, from: usize, to: usize) -> Option<Interaction> {
    let actor = grid.get(from)?.kind();
    let target = grid.get(to).map(|organism| organism.kind());
    let interaction = resolve(actor, target);

    match interaction {
        Interaction::Move => {
            grid.relocate(from, to);
        }
        Interaction::Predation => {
            if let Some(prey) = grid.get_mut(to) {
                prey.kill();
            }
            if let Some(predator) = grid.get_mut(from) {
                predator.add_energy(PREDATION_GAIN);
            }
            grid.relocate(from, to);
        }
        Interaction::Eaten => {
            if let Some(prey) = grid.get_mut(from) {
                prey.kill();
            }
        }
        Interaction::Blocked => {}
    }

    Some(interaction)
}
