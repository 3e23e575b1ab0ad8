use std::sync::Arc;

use log::debug;
use rand::Rng;

use crate::{
    accumulator::{Accumulator, EnergySum},
    dispatch::{Directive, Dispatcher},
    error::{Error, Result},
    neighbor::NeighborListManager,
    parallel::Executor,
    particles::Particles,
    potential::PotentialRegistry,
    region::Region,
    utils::add_assign,
    Container, Settings,
};

/// Everything a calculation reads. Shared with the worker threads while a
/// calculation runs and owned exclusively by the simulation otherwise.
pub struct State {
    container: Container,
    particles: Particles,
    potentials: PotentialRegistry,
    neighbors: NeighborListManager,
}
impl State {
    pub fn container(&self) -> &Container {
        &self.container
    }
    pub fn particles(&self) -> &Particles {
        &self.particles
    }
    pub fn potentials(&self) -> &PotentialRegistry {
        &self.potentials
    }
    pub fn neighbors(&self) -> &NeighborListManager {
        &self.neighbors
    }
    pub fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(
            &self.container,
            &self.particles,
            &self.potentials,
            &self.neighbors,
        )
    }
}

/// Owns the particles, the potentials and the neighbor bookkeeping of one
/// simulation volume, and answers potential calculations over them.
///
/// Every mutation goes through this type so that neighbor lists learn about
/// it. Positions are wrapped into the box on periodic axes.
pub struct Simulation {
    state: Arc<State>,
    settings: Settings,
    executor: Executor,
}
impl Simulation {
    pub fn new(container: Container, settings: Settings) -> Result<Self> {
        settings.validate()?;
        let neighbors = NeighborListManager::new(&container, &settings)?;
        debug!(
            "New simulation in box {:?} with neighbor distance {}",
            container.lengths(),
            settings.neighbor_distance()
        );
        let mut sim = Self {
            state: Arc::new(State {
                container,
                particles: Particles::new(),
                potentials: PotentialRegistry::new(),
                neighbors,
            }),
            settings,
            executor: Executor::new(),
        };
        if sim.settings.num_threads > 1 {
            sim.configure(sim.settings.num_threads)?;
        }
        Ok(sim)
    }

    // Getters

    pub fn state(&self) -> &State {
        &self.state
    }
    pub fn container(&self) -> &Container {
        &self.state.container
    }
    pub fn particles(&self) -> &Particles {
        &self.state.particles
    }
    pub fn potentials(&self) -> &PotentialRegistry {
        &self.state.potentials
    }
    pub fn neighbors(&self) -> &NeighborListManager {
        &self.state.neighbors
    }
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    fn state_mut(&mut self) -> Result<&mut State> {
        Arc::get_mut(&mut self.state).ok_or(Error::StateShared)
    }

    // Particles

    pub fn add_particle(&mut self, kind: usize, position: [f64; 3]) -> Result<usize> {
        let state = self.state_mut()?;
        state.neighbors.check(&state.container)?;
        let position = state.container.wrap(&position);
        let index = state.particles.add(kind, position);
        state.neighbors.assign(index, &position, &state.container)?;
        state.neighbors.invalidate();
        Ok(index)
    }
    pub fn add_random_particles<G, R>(
        &mut self,
        region: &G,
        num_particles: usize,
        kind: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>>
    where
        G: Region,
        R: Rng + ?Sized,
    {
        let state = self.state_mut()?;
        state.neighbors.check(&state.container)?;
        let mut indices = Vec::with_capacity(num_particles);
        for _ in 0..num_particles {
            let position = state.container.wrap(&region.random_coord(rng));
            let index = state.particles.add(kind, position);
            state.neighbors.assign(index, &position, &state.container)?;
            indices.push(index);
        }
        state.neighbors.invalidate();
        Ok(indices)
    }
    pub fn remove_particle(&mut self, index: usize) -> Result<()> {
        let state = self.state_mut()?;
        state.particles.remove(index)?;
        state.neighbors.remove(index);
        state.neighbors.invalidate();
        Ok(())
    }
    /// Move a particle to a new position. The displacement reported to the
    /// neighbor lists is the minimum-image one.
    pub fn set_position(&mut self, index: usize, position: [f64; 3]) -> Result<()> {
        let state = self.state_mut()?;
        state.particles.check_live(index)?;
        let old = *state.particles.position(index);
        let new = state.container.wrap(&position);
        let dr = state.container.separation(&old, &new);
        state.neighbors.assign(index, &new, &state.container)?;
        state.particles.set_position(index, new)?;
        state.neighbors.notify_displaced(index, &dr);
        Ok(())
    }
    /// Move a particle by `dr`
    pub fn displace(&mut self, index: usize, dr: [f64; 3]) -> Result<()> {
        let state = self.state_mut()?;
        state.particles.check_live(index)?;
        let mut position = *state.particles.position(index);
        add_assign(&mut position, &dr);
        let position = state.container.wrap(&position);
        state.neighbors.assign(index, &position, &state.container)?;
        state.particles.set_position(index, position)?;
        state.neighbors.notify_displaced(index, &dr);
        Ok(())
    }

    // Volume

    /// Change the box lengths. Positions are wrapped into the new box; the
    /// cell lattice is kept, so shrinking below the cell size makes the next
    /// move or calculation fail until `recreate_lattice` is called.
    pub fn set_lengths(&mut self, lengths: [f64; 3]) -> Result<()> {
        let state = self.state_mut()?;
        state.container.set_lengths(lengths)?;
        let live: Vec<usize> = state.particles.iter().collect();
        for i in live {
            let wrapped = state.container.wrap(state.particles.position(i));
            state.particles.set_position(i, wrapped)?;
        }
        if state.neighbors.check(&state.container).is_ok() {
            state.neighbors.reassign(&state.particles, &state.container)?;
        }
        state.neighbors.invalidate();
        Ok(())
    }
    /// Re-create the cell lattice for the current box, re-partitioning the
    /// worker regions if its shape changed
    pub fn recreate_lattice(&mut self) -> Result<()> {
        let state = self.state_mut()?;
        state
            .neighbors
            .recreate_lattice(&state.particles, &state.container)?;
        let threads = self.executor.num_threads();
        let reshaped = self
            .executor
            .partition()
            .map_or(false, |p| !p.fits(self.state.neighbors.lattice()));
        if reshaped {
            self.executor
                .configure(threads, self.state.neighbors.lattice())?;
        }
        Ok(())
    }

    // Potentials

    pub fn potentials_mut(&mut self) -> Result<&mut PotentialRegistry> {
        Ok(&mut self.state_mut()?.potentials)
    }

    // Threads

    /// Start `num_threads` workers, one per slab of the cell lattice
    pub fn configure(&mut self, num_threads: usize) -> Result<()> {
        self.executor
            .configure(num_threads, self.state.neighbors.lattice())?;
        self.settings.num_threads = num_threads;
        Ok(())
    }
    pub fn set_num_threads(&mut self, num_threads: usize) -> Result<()> {
        self.configure(num_threads)
    }

    // Calculations

    /// Bring the neighbor lists up to date and evaluate `directive` into `acc`
    pub fn calculate<A: Accumulator>(&mut self, directive: &Directive, acc: &mut A) -> Result<()> {
        let potential_range = self.state.potentials.max_range();
        let neighbor_range = self.state.neighbors.range();
        if potential_range > neighbor_range {
            return Err(Error::RangeExceeded {
                potential_range,
                neighbor_range,
            });
        }
        let state = self.state_mut()?;
        state
            .neighbors
            .ensure_current(&state.particles, &state.container)?;
        self.executor.calculate(&self.state, directive, acc)
    }
    /// Total potential energy of every particle
    pub fn energy(&mut self) -> Result<f64> {
        let mut energy = EnergySum::new();
        self.calculate(&Directive::all(), &mut energy)?;
        Ok(energy.energy())
    }
    /// Potential energy of everything particle `index` takes part in
    pub fn particle_energy(&mut self, index: usize) -> Result<f64> {
        let mut energy = EnergySum::new();
        self.calculate(&Directive::single(index), &mut energy)?;
        Ok(energy.energy())
    }
}
