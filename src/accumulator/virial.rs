use super::Accumulator;
use crate::potential::{Group, Potential};

/// Virial tensor `sum_k r_k (x) F_k`, with member positions taken relative to
/// the first member of each group under the minimum image
#[derive(Clone, Debug, Default)]
pub struct VirialSum {
    tensor: [[f64; 3]; 3],
    scratch: Vec<[f64; 3]>,
}
impl VirialSum {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn tensor(&self) -> &[[f64; 3]; 3] {
        &self.tensor
    }
    pub fn trace(&self) -> f64 {
        self.tensor[0][0] + self.tensor[1][1] + self.tensor[2][2]
    }
}
impl Accumulator for VirialSum {
    fn reset(&mut self) {
        self.tensor = [[0.0; 3]; 3];
    }
    fn accumulate(&mut self, group: &Group<'_>, potential: &dyn Potential) {
        self.scratch.clear();
        self.scratch.resize(group.len(), [0.0; 3]);
        potential.gradient(group, &mut self.scratch);

        // the first member sits at the origin and contributes nothing
        for k in 1..group.len() {
            let r = group.relative(k);
            let g = self.scratch[k];
            for a in 0..3 {
                for b in 0..3 {
                    self.tensor[a][b] -= r[a] * g[b];
                }
            }
        }
    }
    fn combine(&mut self, other: &Self) {
        for a in 0..3 {
            for b in 0..3 {
                self.tensor[a][b] += other.tensor[a][b];
            }
        }
    }
}
