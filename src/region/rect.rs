use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Region;
use crate::utils::Axis;

/// Axis-aligned rectangular box
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    lo: [f64; 3],
    hi: [f64; 3],
}
impl Rect {
    pub fn new(xlo: f64, xhi: f64, ylo: f64, yhi: f64, zlo: f64, zhi: f64) -> Self {
        Self {
            lo: [xlo, ylo, zlo],
            hi: [xhi, yhi, zhi],
        }
    }
    /// Box with its lower corner at the origin
    pub fn from_lengths(lengths: [f64; 3]) -> Self {
        Self {
            lo: [0.0; 3],
            hi: lengths,
        }
    }
    pub fn lo(&self) -> [f64; 3] {
        self.lo
    }
    pub fn hi(&self) -> [f64; 3] {
        self.hi
    }
    pub fn length(&self, axis: Axis) -> f64 {
        self.hi[axis.index()] - self.lo[axis.index()]
    }
    pub fn lengths(&self) -> [f64; 3] {
        [
            self.hi[0] - self.lo[0],
            self.hi[1] - self.lo[1],
            self.hi[2] - self.lo[2],
        ]
    }
    pub fn volume(&self) -> f64 {
        let l = self.lengths();
        l[0] * l[1] * l[2]
    }
    /// Length of the body diagonal
    pub fn diagonal(&self) -> f64 {
        let l = self.lengths();
        (l[0] * l[0] + l[1] * l[1] + l[2] * l[2]).sqrt()
    }
    /// Keep `lo` and move `hi` so the box has the given lengths
    pub fn set_lengths(&mut self, lengths: [f64; 3]) {
        for i in 0..3 {
            self.hi[i] = self.lo[i] + lengths[i];
        }
    }
    pub(crate) fn is_valid(&self) -> bool {
        (0..3).all(|i| self.lo[i].is_finite() && self.hi[i].is_finite() && self.hi[i] > self.lo[i])
    }
}
impl Region for Rect {
    fn contains(&self, coord: &[f64; 3]) -> bool {
        (0..3).all(|i| self.lo[i] <= coord[i] && coord[i] <= self.hi[i])
    }
    fn random_coord<R: Rng + ?Sized>(&self, rng: &mut R) -> [f64; 3] {
        [
            rng.gen::<f64>() * self.length(Axis::X) + self.lo[0],
            rng.gen::<f64>() * self.length(Axis::Y) + self.lo[1],
            rng.gen::<f64>() * self.length(Axis::Z) + self.lo[2],
        ]
    }
}
