#![allow(dead_code)]

use jcell::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Counts one unit of energy per particle
pub struct Unit;
impl Potential for Unit {
    fn arity(&self) -> Arity {
        Arity::OneBody
    }
    fn range(&self) -> f64 {
        0.0
    }
    fn energy(&self, _group: &Group<'_>) -> f64 {
        1.0
    }
}

pub fn lj(cutoff: f64) -> LJCut {
    let mut lj = LJCut::new(1, cutoff);
    lj.set_coeff(0, 0, 1.0, 1.0, cutoff).unwrap();
    lj
}

/// Particles on a simple cubic grid with some random jitter, so that no two
/// sit much closer than the grid spacing
pub fn jittered_grid(sim: &mut Simulation, per_side: usize, jitter: f64, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let lengths = sim.container().lengths();
    for i in 0..per_side {
        for j in 0..per_side {
            for k in 0..per_side {
                let mut pos = [0.0; 3];
                for (a, n) in [i, j, k].into_iter().enumerate() {
                    let spacing = lengths[a] / per_side as f64;
                    pos[a] = (n as f64 + 0.5) * spacing + rng.gen_range(-jitter..jitter);
                }
                sim.add_particle(0, pos).unwrap();
            }
        }
    }
}

pub fn random_particles(sim: &mut Simulation, n: usize, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let rect = Rect::from_lengths(sim.container().lengths());
    sim.add_random_particles(&rect, n, 0, &mut rng).unwrap();
}

pub fn relative_difference(a: f64, b: f64) -> f64 {
    (a - b).abs() / a.abs().max(b.abs()).max(1e-300)
}
