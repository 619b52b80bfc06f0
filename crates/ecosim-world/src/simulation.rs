//! Simulation engine: one tick is an intake pass followed by a
//! move/interact/reproduce/die pass, each over a freshly shuffled cell order.
//!
//! There is no generation buffer. Organisms see the grid as it is at the moment
//! they are visited, including moves already made earlier in the same pass.
//! Scheduling is by cell, but each organism acts at most once per pass: one
//! that moves into a cell visited later in the same pass is not run again.
//! Offspring wait for the next tick. Both keep a lone organism's movement cost
//! at one charge per tick.

use crate::grid::{Grid, OrganismId};
use crate::interaction::{interact_at, Interaction};
use crate::organism::Organism;
use crate::stats::{Census, RunTotals, TickStats};
use ecosim_core::{CellView, OrganismKind, Result, SimConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, instrument, trace};

pub struct Simulation {
    grid: Grid,
    config: SimConfig,
    rng: ChaCha8Rng,
    tick: u64,
    acted: HashSet<OrganismId>,
    current: TickStats,
    last_tick: TickStats,
    totals: RunTotals,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;

        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let grid = Grid::from_config(&config.world);

        let mut sim = Self {
            grid,
            config,
            rng,
            tick: 0,
            acted: HashSet::new(),
            current: TickStats::default(),
            last_tick: TickStats::default(),
            totals: RunTotals::default(),
        };

        let seeds = sim.config.initial_population.clone();
        for seed in seeds {
            sim.spawn(seed.kind, seed.energy, seed.index)?;
        }

        debug!(
            width = sim.grid.width,
            height = sim.grid.height,
            population = sim.grid.population(),
            seed = sim.config.seed,
            "Simulation seeded"
        );

        Ok(sim)
    }

    /// Place a new organism on an empty cell
    pub fn spawn(&mut self, kind: OrganismKind, energy: f64, index: usize) -> Result<OrganismId> {
        self.grid.try_insert_at(index, Organism::new(kind, energy))
    }

    /// Advance exactly one tick
    pub fn update(&mut self) {
        self.current = TickStats::default();

        self.intake_pass();
        self.movement_pass();

        self.tick += 1;
        self.last_tick = self.current;
        self.totals.record(&self.current);
    }

    fn intake_pass(&mut self) {
        let order = self.grid.random_permutation(&mut self.rng);
        for index in order {
            let Some(organism) = self.grid.get_mut(index) else {
                continue;
            };
            if let Some(bonus) = self.config.energy.intake_for(organism.kind()) {
                organism.consume_energy(bonus);
            }
        }
    }

    fn movement_pass(&mut self) {
        // Calls to `process_cell` between ticks must not carry over.
        self.acted.clear();
        let order = self.grid.random_permutation(&mut self.rng);
        for index in order {
            self.process_cell(index);
        }
        self.acted.clear();
    }

    /// Run the second-pass sequence for whatever occupies `index`:
    /// movement cost, interaction or relocation, reproduction, death check.
    ///
    /// Does nothing for an empty cell or an organism that already acted in
    /// the current pass.
    pub fn process_cell(&mut self, index: usize) {
        let Some(id) = self.grid.occupant(index) else {
            return;
        };
        if !self.acted.insert(id) {
            return;
        }
        let Some(organism) = self.grid.get_mut(index) else {
            return;
        };

        organism.pay_movement();
        if organism.should_die() {
            self.remove_dead(index);
            return;
        }

        let target = self.grid.random_neighbor_of(index, &mut self.rng);
        let position = if self.grid.is_occupied(target) {
            let interaction = interact_at(&mut self.grid, index, target);
            match interaction {
                Some(Interaction::Predation) => {
                    self.current.predations += 1;
                    trace!(from = index, to = target, tick = self.tick, "Predator ate prey");
                }
                Some(Interaction::Eaten) => {
                    self.current.fatal_encounters += 1;
                    trace!(from = index, to = target, tick = self.tick, "Prey ran into predator");
                    self.grid.remove_at(index);
                    return;
                }
                _ => {}
            }
            match interaction {
                Some(interaction) if interaction.relocates() => target,
                _ => index,
            }
        } else {
            self.grid.relocate(index, target);
            target
        };

        self.reproduce_at(position);

        if self.grid.get(position).is_some_and(Organism::should_die) {
            self.remove_dead(position);
        }
    }

    fn reproduce_at(&mut self, position: usize) {
        let Some(offspring) = self.grid.get_mut(position).and_then(Organism::try_reproduce) else {
            return;
        };

        let destination = self.grid.random_neighbor_of(position, &mut self.rng);
        if self.grid.is_occupied(destination) {
            self.current.lost_offspring += 1;
            trace!(
                parent = position,
                destination = destination,
                kind = %offspring.kind(),
                tick = self.tick,
                "Offspring lost: destination occupied"
            );
            return;
        }

        trace!(
            parent = position,
            destination = destination,
            kind = %offspring.kind(),
            tick = self.tick,
            "Offspring born"
        );
        let id = self.grid.insert_at(destination, offspring);
        self.acted.insert(id);
        self.current.births += 1;
    }

    fn remove_dead(&mut self, index: usize) {
        if let Some(organism) = self.grid.remove_at(index) {
            self.current.starvations += 1;
            trace!(
                index = index,
                kind = %organism.kind(),
                energy = organism.energy(),
                tick = self.tick,
                "Organism died"
            );
        }
    }

    /// Run the simulation for the configured number of ticks.
    ///
    /// Stops early once every organism is gone.
    #[instrument(skip(self), fields(num_ticks = self.config.num_ticks, seed = self.config.seed))]
    pub fn run(&mut self) -> SimulationResult {
        info!("Starting simulation for {} ticks", self.config.num_ticks);

        let start = self.tick;
        let mut extinct = self.grid.population() == 0;

        while !extinct && self.tick - start < self.config.num_ticks {
            self.update();

            let interval = self.config.report_interval;
            if interval > 0 && self.tick % interval == 0 {
                self.emit_population_metrics();
            }

            if self.grid.population() == 0 {
                extinct = true;
                debug!(tick = self.tick, "Population extinct, stopping early");
            }
        }

        let result = SimulationResult {
            ticks_run: self.tick - start,
            final_tick: self.tick,
            final_census: self.census(),
            totals: self.totals,
            extinct,
        };

        info!(
            event = "run_summary",
            ticks_run = result.ticks_run,
            predators = result.final_census.predators,
            prey = result.final_census.prey,
            births = result.totals.births,
            lost_offspring = result.totals.lost_offspring,
            predations = result.totals.predations,
            fatal_encounters = result.totals.fatal_encounters,
            starvations = result.totals.starvations,
            extinct = result.extinct,
            "Simulation complete"
        );

        result
    }

    fn emit_population_metrics(&self) {
        let census = self.census();
        info!(
            event = "population_metrics",
            tick = self.tick,
            predators = census.predators,
            prey = census.prey,
            mean_predator_energy = format!("{:.2}", census.mean_predator_energy),
            mean_prey_energy = format!("{:.2}", census.mean_prey_energy),
            births = self.last_tick.births,
            deaths = self.last_tick.deaths(),
            "Population metrics snapshot"
        );
    }

    /// Number of ticks completed so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        self.grid.is_occupied(index)
    }

    pub fn cell(&self, index: usize) -> CellView {
        self.grid.cell(index)
    }

    pub fn organism_at(&self, index: usize) -> Option<&Organism> {
        self.grid.get(index)
    }

    /// Row-major views of every cell, for renderers
    pub fn cells(&self) -> impl Iterator<Item = CellView> + '_ {
        (0..self.grid.size()).map(move |i| self.grid.cell(i))
    }

    pub fn census(&self) -> Census {
        Census::take(&self.grid)
    }

    /// Events of the most recently completed tick
    pub fn last_tick_stats(&self) -> TickStats {
        self.last_tick
    }

    /// Events recorded so far in the tick in progress (or by direct
    /// [`Simulation::process_cell`] calls since the last tick)
    pub fn pending_stats(&self) -> TickStats {
        self.current
    }

    pub fn totals(&self) -> RunTotals {
        self.totals
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub ticks_run: u64,
    pub final_tick: u64,
    pub final_census: Census,
    pub totals: RunTotals,
    pub extinct: bool,
}
