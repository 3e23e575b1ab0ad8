use log::debug;

use super::CellLattice;
use crate::{
    error::Result,
    particles::Particles,
    utils::{add_assign, norm_squared},
    Container, Settings,
};

/// Per-particle lists of every other particle within `range + skin`,
/// derived from a cell lattice. Lists are sorted by ascending index.
///
/// Only indices are stored. Separations are recomputed from the current
/// positions under the minimum image whenever a pair is evaluated, so they
/// stay exact while the lists themselves are only refreshed past half the
/// skin.
///
/// The lattice is kept current on every move: `assign` and `remove` update
/// a single particle's cell without touching the lists.
///
/// Staleness is pushed in from outside through `notify_displaced` and
/// `invalidate`. A caller that moves particles without telling the manager
/// gets answers computed against the old lists.
#[derive(Clone, Debug)]
pub struct NeighborListManager {
    range: f64,
    skin: f64,
    check: bool,
    lattice: CellLattice,
    neighbors: Vec<Vec<usize>>,
    displacements: Vec<[f64; 3]>,
    max_displacement_sq: f64,
    stale: bool,
    built: bool,
    rebuilds: usize,
}
impl NeighborListManager {
    pub fn new(container: &Container, settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let lattice =
            CellLattice::with_range(container, settings.min_cell_size(), settings.neighbor_distance())?;
        Ok(Self {
            range: settings.range,
            skin: settings.skin,
            check: settings.check,
            lattice,
            neighbors: Vec::new(),
            displacements: Vec::new(),
            max_displacement_sq: 0.0,
            stale: true,
            built: false,
            rebuilds: 0,
        })
    }

    // Getters

    pub fn range(&self) -> f64 {
        self.range
    }
    pub fn skin_distance(&self) -> f64 {
        self.skin
    }
    pub fn neighbor_distance(&self) -> f64 {
        self.range + self.skin
    }
    pub fn lattice(&self) -> &CellLattice {
        &self.lattice
    }
    pub fn is_stale(&self) -> bool {
        self.stale || !self.built
    }
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }
    /// Largest displacement of any particle since the last rebuild
    pub fn max_displacement(&self) -> f64 {
        self.max_displacement_sq.sqrt()
    }

    /// Neighbor list of a particle, rebuilding every list first if stale
    pub fn get(
        &mut self,
        index: usize,
        particles: &Particles,
        container: &Container,
    ) -> Result<&[usize]> {
        particles.check_live(index)?;
        self.ensure_current(particles, container)?;
        Ok(self.neighbors(index))
    }

    /// Neighbor list as of the last rebuild
    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.neighbors.get(index).map_or(&[], |n| n.as_slice())
    }
    /// Neighbors with a strictly greater index
    pub fn up_neighbors(&self, index: usize) -> &[usize] {
        let n = self.neighbors(index);
        &n[n.partition_point(|&j| j <= index)..]
    }
    /// Neighbors with a strictly lower index
    pub fn down_neighbors(&self, index: usize) -> &[usize] {
        let n = self.neighbors(index);
        &n[..n.partition_point(|&j| j < index)]
    }

    // Cells

    /// Move a particle into the cell covering `position`. Fails with
    /// `CellTooSmall` while the lattice no longer fits the box.
    pub fn assign(&mut self, index: usize, position: &[f64; 3], container: &Container) -> Result<usize> {
        self.lattice.assign(index, position, container)
    }
    /// Take a particle out of its cell
    pub fn remove(&mut self, index: usize) {
        self.lattice.remove(index);
    }
    /// Place every live particle in its cell again
    pub fn reassign(&mut self, particles: &Particles, container: &Container) -> Result<()> {
        self.lattice.rebuild(particles, container)
    }
    /// Whether the lattice still fits the box
    pub fn check(&self, container: &Container) -> Result<()> {
        self.lattice.check(container)
    }

    // Staleness

    /// Record that a particle moved by `dr`. Once any particle has moved
    /// more than half the skin since the last rebuild, all lists are stale.
    pub fn notify_displaced(&mut self, index: usize, dr: &[f64; 3]) {
        if self.displacements.len() <= index {
            self.displacements.resize(index + 1, [0.0; 3]);
        }
        let total = &mut self.displacements[index];
        add_assign(total, dr);
        let dist_sq = norm_squared(total);
        self.max_displacement_sq = self.max_displacement_sq.max(dist_sq);

        let half_skin = 0.5 * self.skin;
        if !self.check || dist_sq > half_skin * half_skin {
            self.stale = true;
        }
    }
    /// Mark every list stale, e.g. after insertion, removal or a volume change
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Rebuild if stale. Returns whether a rebuild happened.
    pub fn ensure_current(&mut self, particles: &Particles, container: &Container) -> Result<bool> {
        if !self.is_stale() {
            return Ok(false);
        }
        self.rebuild(particles, container)?;
        Ok(true)
    }

    pub fn rebuild(&mut self, particles: &Particles, container: &Container) -> Result<()> {
        self.lattice.rebuild(particles, container)?;

        let cutoff_sq = self.neighbor_distance() * self.neighbor_distance();
        let lattice = &self.lattice;
        let lists = &mut self.neighbors;
        lists.iter_mut().for_each(Vec::clear);
        lists.resize_with(particles.capacity(), Vec::new);

        let mut num_pairs = 0;
        for i in particles.iter() {
            let Some(cell) = lattice.cell_of(i) else {
                continue;
            };
            let pos_i = particles.position(i);
            let list = &mut lists[i];
            for &c in lattice.neighborhood(cell) {
                for &j in lattice.occupants(c) {
                    if j != i && container.distance_sq(pos_i, particles.position(j)) <= cutoff_sq {
                        list.push(j);
                    }
                }
            }
            list.sort_unstable();
            num_pairs += list.len();
        }

        self.displacements.clear();
        self.displacements.resize(particles.capacity(), [0.0; 3]);
        self.max_displacement_sq = 0.0;
        self.stale = false;
        self.built = true;
        self.rebuilds += 1;
        debug!(
            "Rebuilt neighbor lists for {} particles: {} pairs (rebuild #{})",
            particles.len(),
            num_pairs / 2,
            self.rebuilds
        );
        Ok(())
    }

    /// Re-create the cell lattice after a volume change and place every
    /// particle in it again
    pub fn recreate_lattice(&mut self, particles: &Particles, container: &Container) -> Result<()> {
        self.lattice.recreate(container)?;
        self.lattice.rebuild(particles, container)?;
        self.stale = true;
        Ok(())
    }
}
