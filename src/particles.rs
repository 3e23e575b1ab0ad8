use std::collections::BTreeSet;

use rand::Rng;

use crate::{
    error::{Error, Result},
    region::Region,
};

/// Particle arena. Each particle is a stable index into parallel arrays of
/// kinds and positions. Removal leaves a tombstone whose index is handed out
/// again by the next insertion, lowest first.
#[derive(Clone, Debug, Default)]
pub struct Particles {
    kinds: Vec<usize>,
    positions: Vec<[f64; 3]>,
    live: Vec<bool>,
    free: BTreeSet<usize>,
}
impl Particles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live particles
    pub fn len(&self) -> usize {
        self.live.len() - self.free.len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// One past the largest index ever handed out
    pub fn capacity(&self) -> usize {
        self.live.len()
    }
    pub fn is_live(&self, index: usize) -> bool {
        self.live.get(index).copied().unwrap_or(false)
    }
    /// Live indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.live
            .iter()
            .enumerate()
            .filter_map(|(i, &live)| live.then_some(i))
    }
    pub fn kind(&self, index: usize) -> usize {
        self.kinds[index]
    }
    pub fn position(&self, index: usize) -> &[f64; 3] {
        &self.positions[index]
    }
    /// Positions of every slot, including tombstones
    pub fn positions(&self) -> &[[f64; 3]] {
        &self.positions
    }
    pub fn kinds(&self) -> &[usize] {
        &self.kinds
    }

    pub fn add(&mut self, kind: usize, position: [f64; 3]) -> usize {
        match self.free.pop_first() {
            Some(i) => {
                self.kinds[i] = kind;
                self.positions[i] = position;
                self.live[i] = true;
                i
            }
            None => {
                self.kinds.push(kind);
                self.positions.push(position);
                self.live.push(true);
                self.live.len() - 1
            }
        }
    }
    pub fn add_many(&mut self, kind: usize, coords: &[[f64; 3]]) -> Vec<usize> {
        coords.iter().map(|c| self.add(kind, *c)).collect()
    }
    pub fn add_random<G, R>(
        &mut self,
        region: &G,
        num_particles: usize,
        kind: usize,
        rng: &mut R,
    ) -> Vec<usize>
    where
        G: Region,
        R: Rng + ?Sized,
    {
        (0..num_particles)
            .map(|_| {
                let coord = region.random_coord(rng);
                self.add(kind, coord)
            })
            .collect()
    }
    pub fn remove(&mut self, index: usize) -> Result<()> {
        self.check_live(index)?;
        self.live[index] = false;
        self.free.insert(index);
        Ok(())
    }
    pub fn set_position(&mut self, index: usize, position: [f64; 3]) -> Result<()> {
        self.check_live(index)?;
        self.positions[index] = position;
        Ok(())
    }

    pub(crate) fn check_live(&self, index: usize) -> Result<()> {
        if self.is_live(index) {
            Ok(())
        } else {
            Err(Error::UnknownParticle(index))
        }
    }
}
