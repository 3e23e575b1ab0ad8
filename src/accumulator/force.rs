use super::Accumulator;
use crate::{
    potential::{Group, Potential},
    utils::add_assign,
};

/// Force on every particle, indexed by stable particle index
#[derive(Clone, Debug, Default)]
pub struct ForceSum {
    forces: Vec<[f64; 3]>,
    scratch: Vec<[f64; 3]>,
}
impl ForceSum {
    pub fn new() -> Self {
        Self::default()
    }
    /// Forces up to the largest index seen so far
    pub fn forces(&self) -> &[[f64; 3]] {
        &self.forces
    }
    pub fn force(&self, index: usize) -> [f64; 3] {
        self.forces.get(index).copied().unwrap_or([0.0; 3])
    }
    fn grow(&mut self, len: usize) {
        if self.forces.len() < len {
            self.forces.resize(len, [0.0; 3]);
        }
    }
}
impl Accumulator for ForceSum {
    fn reset(&mut self) {
        self.forces.iter_mut().for_each(|f| *f = [0.0; 3]);
    }
    fn accumulate(&mut self, group: &Group<'_>, potential: &dyn Potential) {
        self.scratch.clear();
        self.scratch.resize(group.len(), [0.0; 3]);
        potential.gradient(group, &mut self.scratch);

        if let Some(&max) = group.members().iter().max() {
            self.grow(max + 1);
        }
        for (k, &i) in group.members().iter().enumerate() {
            let g = self.scratch[k];
            add_assign(&mut self.forces[i], &[-g[0], -g[1], -g[2]]);
        }
    }
    fn combine(&mut self, other: &Self) {
        self.grow(other.forces.len());
        for (f, g) in self.forces.iter_mut().zip(&other.forces) {
            add_assign(f, g);
        }
    }
}
