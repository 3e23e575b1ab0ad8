use super::Accumulator;
use crate::potential::{Group, Potential};

/// Total potential energy. Overlap sentinels (`+inf`, `NaN`) pass through.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnergySum {
    energy: f64,
}
impl EnergySum {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn energy(&self) -> f64 {
        self.energy
    }
}
impl Accumulator for EnergySum {
    fn reset(&mut self) {
        self.energy = 0.0;
    }
    fn accumulate(&mut self, group: &Group<'_>, potential: &dyn Potential) {
        self.energy += potential.energy(group);
    }
    fn combine(&mut self, other: &Self) {
        self.energy += other.energy;
    }
}
