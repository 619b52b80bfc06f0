//! 2D toroidal grid holding at most one organism per cell.
//!
//! Organisms live in a generational arena; cells only hold handles into it. A
//! handle is never stored in two cells at once, so moving an organism is a
//! matter of clearing one slot and filling another.

use crate::organism::Organism;
use ecosim_core::{CellView, Error, Neighborhood, Position, Result, WorldConfig};
use rand::seq::SliceRandom;
use rand::Rng;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable handle for an organism in the grid's arena.
    pub struct OrganismId;
}

/// A 2D toroidal grid of cells
#[derive(Debug, Clone)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    neighborhood: Neighborhood,
    cells: Vec<Option<OrganismId>>,
    organisms: SlotMap<OrganismId, Organism>,
}

impl Grid {
    pub fn new(width: i32, height: i32, neighborhood: Neighborhood) -> Self {
        let size = width.max(0) as usize * height.max(0) as usize;
        Self {
            width,
            height,
            neighborhood,
            cells: vec![None; size],
            organisms: SlotMap::with_capacity_and_key(size),
        }
    }

    /// Create an empty grid from world configuration
    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.width, config.height, config.neighborhood)
    }

    /// Total number of cells
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn neighborhood(&self) -> Neighborhood {
        self.neighborhood
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        self.cells[index].is_some()
    }

    /// Handle of the organism at `index`, if any
    pub fn occupant(&self, index: usize) -> Option<OrganismId> {
        self.cells[index]
    }

    pub fn get(&self, index: usize) -> Option<&Organism> {
        let id = self.cells[index]?;
        self.organisms.get(id)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Organism> {
        let id = self.cells[index]?;
        self.organisms.get_mut(id)
    }

    /// Look an organism up by handle
    pub fn organism(&self, id: OrganismId) -> Option<&Organism> {
        self.organisms.get(id)
    }

    /// Place an organism at `index`.
    ///
    /// Callers vacate the cell first; anything still there is released.
    pub fn insert_at(&mut self, index: usize, organism: Organism) -> OrganismId {
        debug_assert!(
            !self.is_occupied(index),
            "insert into occupied cell {index}"
        );
        self.remove_at(index);
        let id = self.organisms.insert(organism);
        self.cells[index] = Some(id);
        id
    }

    /// Checked variant of [`Grid::insert_at`] for placements coming from outside the engine
    pub fn try_insert_at(&mut self, index: usize, organism: Organism) -> Result<OrganismId> {
        if index >= self.size() {
            return Err(Error::OutOfBounds {
                index,
                size: self.size(),
            });
        }
        if self.is_occupied(index) {
            return Err(Error::CellOccupied(index));
        }
        Ok(self.insert_at(index, organism))
    }

    /// Free the cell at `index`, returning the organism that lived there
    pub fn remove_at(&mut self, index: usize) -> Option<Organism> {
        self.cells[index]
            .take()
            .and_then(|id| self.organisms.remove(id))
    }

    /// Move the occupant of `from` into `to`, leaving `from` empty.
    ///
    /// Whatever occupied `to` is released and returned. Does nothing if `from`
    /// is empty or equal to `to`.
    pub fn relocate(&mut self, from: usize, to: usize) -> Option<Organism> {
        if from == to {
            return None;
        }
        let id = self.cells[from].take()?;
        let displaced = self.remove_at(to);
        self.cells[to] = Some(id);
        displaced
    }

    /// One uniformly drawn neighbor of `index`, wrapping at the edges
    pub fn random_neighbor_of<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> usize {
        let offsets = self.neighborhood.offsets();
        let (dx, dy) = offsets[rng.gen_range(0..offsets.len())];
        let pos = self.index_to_pos(index).add(dx, dy);
        self.pos_to_index(pos)
    }

    /// All neighbors of `index` in the grid's topology
    pub fn neighbors_of(&self, index: usize) -> Vec<usize> {
        let pos = self.index_to_pos(index);
        self.neighborhood
            .offsets()
            .iter()
            .map(|&(dx, dy)| self.pos_to_index(pos.add(dx, dy)))
            .collect()
    }

    /// A freshly shuffled ordering of every cell index
    pub fn random_permutation<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.size()).collect();
        order.shuffle(rng);
        order
    }

    /// Linear index of a position (with toroidal wrapping)
    pub fn pos_to_index(&self, pos: Position) -> usize {
        let wrapped = pos.wrap(self.width, self.height);
        (wrapped.y * self.width + wrapped.x) as usize
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let x = (index as i32) % self.width;
        let y = (index as i32) / self.width;
        Position::new(x, y)
    }

    pub fn cell(&self, index: usize) -> CellView {
        match self.get(index) {
            Some(organism) => CellView::Occupied {
                kind: organism.kind(),
                energy: organism.energy(),
            },
            None => CellView::Empty,
        }
    }

    /// Number of organisms alive in the arena
    pub fn population(&self) -> usize {
        self.organisms.len()
    }

    /// Number of cells holding an organism
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Iterator over all occupied cells with their organisms
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Organism)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| {
                let id = (*cell)?;
                self.organisms.get(id).map(|organism| (i, organism))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecosim_core::OrganismKind;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10, 10, Neighborhood::Moore);
        assert_eq!(grid.width, 10);
        assert_eq!(grid.height, 10);
        assert_eq!(grid.size(), 100);
        assert_eq!(grid.population(), 0);
        assert!((0..100).all(|i| !grid.is_occupied(i)));
    }

    #[test]
    fn test_insert_and_remove() {
        let mut grid = Grid::new(4, 4, Neighborhood::Moore);
        let id = grid.insert_at(5, Organism::prey(3.0));

        assert!(grid.is_occupied(5));
        assert_eq!(grid.occupant(5), Some(id));
        assert_eq!(grid.get(5).unwrap().energy(), 3.0);

        let removed = grid.remove_at(5).unwrap();
        assert_eq!(removed.kind(), OrganismKind::Prey);
        assert!(!grid.is_occupied(5));
        assert!(grid.organism(id).is_none());
        assert!(grid.remove_at(5).is_none());
    }

    #[test]
    fn test_try_insert_checks_bounds_and_occupancy() {
        let mut grid = Grid::new(3, 3, Neighborhood::Moore);
        assert!(grid.try_insert_at(4, Organism::prey(1.0)).is_ok());
        assert!(matches!(
            grid.try_insert_at(4, Organism::predator(1.0)),
            Err(Error::CellOccupied(4))
        ));
        assert!(matches!(
            grid.try_insert_at(9, Organism::predator(1.0)),
            Err(Error::OutOfBounds { index: 9, size: 9 })
        ));
        assert_eq!(grid.population(), 1);
    }

    #[test]
    fn test_relocate_into_empty_cell() {
        let mut grid = Grid::new(4, 4, Neighborhood::Moore);
        let id = grid.insert_at(0, Organism::predator(5.0));

        assert!(grid.relocate(0, 1).is_none());
        assert!(!grid.is_occupied(0));
        assert_eq!(grid.occupant(1), Some(id));
        assert_eq!(grid.population(), 1);
    }

    #[test]
    fn test_relocate_releases_displaced_occupant() {
        let mut grid = Grid::new(4, 4, Neighborhood::Moore);
        let predator = grid.insert_at(0, Organism::predator(5.0));
        let prey = grid.insert_at(1, Organism::prey(5.0));

        let displaced = grid.relocate(0, 1).unwrap();
        assert_eq!(displaced.kind(), OrganismKind::Prey);
        assert_eq!(grid.occupant(1), Some(predator));
        assert!(grid.organism(prey).is_none());
        assert_eq!(grid.population(), 1);
    }

    #[test]
    fn test_relocate_from_empty_is_noop() {
        let mut grid = Grid::new(4, 4, Neighborhood::Moore);
        grid.insert_at(1, Organism::prey(5.0));
        assert!(grid.relocate(0, 1).is_none());
        assert!(grid.is_occupied(1));
        assert_eq!(grid.population(), 1);
    }

    #[test]
    fn test_neighbors_wrap() {
        let grid = Grid::new(10, 10, Neighborhood::VonNeumann);
        let mut neighbors = grid.neighbors_of(0);
        neighbors.sort();
        assert_eq!(neighbors, vec![1, 9, 10, 90]);

        let grid = Grid::new(10, 10, Neighborhood::Moore);
        let mut neighbors = grid.neighbors_of(0);
        neighbors.sort();
        assert_eq!(neighbors, vec![1, 9, 10, 11, 19, 90, 91, 99]);
    }

    #[test]
    fn test_random_neighbor_is_adjacent() {
        let grid = Grid::new(10, 10, Neighborhood::Moore);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let neighbors = grid.neighbors_of(55);

        for _ in 0..200 {
            let j = grid.random_neighbor_of(55, &mut rng);
            assert!(neighbors.contains(&j));
            assert_ne!(j, 55);
        }
    }

    #[test]
    fn test_random_permutation_covers_all_cells() {
        let grid = Grid::new(7, 5, Neighborhood::Moore);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let mut order = grid.random_permutation(&mut rng);
        assert_eq!(order.len(), 35);
        order.sort();
        assert_eq!(order, (0..35).collect::<Vec<_>>());
    }

    #[test]
    fn test_cell_view() {
        let mut grid = Grid::new(2, 2, Neighborhood::Moore);
        grid.insert_at(3, Organism::predator(7.5));
        assert_eq!(grid.cell(0), CellView::Empty);
        assert_eq!(
            grid.cell(3),
            CellView::Occupied {
                kind: OrganismKind::Predator,
                energy: 7.5
            }
        );
        assert_eq!(grid.iter().count(), 1);
    }

    proptest! {
        #[test]
        fn prop_relocations_never_duplicate_handles(
            moves in proptest::collection::vec((0usize..25, 0usize..25), 0..200)
        ) {
            let mut grid = Grid::new(5, 5, Neighborhood::Moore);
            for i in (0..25).step_by(3) {
                grid.insert_at(i, Organism::prey(1.0));
            }

            for (from, to) in moves {
                grid.relocate(from, to);
                prop_assert_eq!(grid.occupied_count(), grid.population());
                prop_assert!(grid.population() <= grid.size());
            }
        }

        #[test]
        fn prop_index_position_round_trip(width in 1i32..50, height in 1i32..50, seed in any::<u64>()) {
            let grid = Grid::new(width, height, Neighborhood::Moore);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let index = rng.gen_range(0..grid.size());
            prop_assert_eq!(grid.pos_to_index(grid.index_to_pos(index)), index);
        }
    }
}
