//! The seam between the engine and the physics. The engine only knows how
//! many particles a potential acts on and how far it reaches; the formula is
//! entirely the potential's business.

mod hard_sphere;
mod ljcut;
mod registry;

pub use hard_sphere::HardSphere;
pub use ljcut::{LJCut, LJCutCoeff};
pub use registry::{FixedGroup, PotentialRegistry};

use crate::{particles::Particles, Container};

/// Number of particles a potential couples
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Arity {
    /// External fields acting on a single particle
    OneBody,
    /// Pairwise interactions
    TwoBody,
    /// Interactions among a particle and several partners
    ManyBody,
}

/// Trait for potentials of any arity
pub trait Potential: Send + Sync {
    fn arity(&self) -> Arity;

    /// Maximum distance for effective interaction. Ignored for one-body
    /// potentials and for fixed groups.
    fn range(&self) -> f64;

    /// Energy of a group. May be `f64::INFINITY` for overlapping hard cores.
    fn energy(&self, group: &Group<'_>) -> f64;

    /// Gradient of `energy` with respect to the position of every member,
    /// written to `gradient[k]` for member `k`.
    fn gradient(&self, _group: &Group<'_>, gradient: &mut [[f64; 3]]) {
        gradient.iter_mut().for_each(|g| *g = [0.0; 3]);
    }
}

/// Particles handed to one potential evaluation.
///
/// For pairs the first member is the particle being visited. For centered
/// many-body groups the first member is the center and the rest are its
/// neighbors within the potential's range, in ascending index order.
#[derive(Clone, Copy)]
pub struct Group<'a> {
    members: &'a [usize],
    particles: &'a Particles,
    container: &'a Container,
}
impl<'a> Group<'a> {
    pub fn new(members: &'a [usize], particles: &'a Particles, container: &'a Container) -> Self {
        Self {
            members,
            particles,
            container,
        }
    }
    pub fn len(&self) -> usize {
        self.members.len()
    }
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
    pub fn members(&self) -> &'a [usize] {
        self.members
    }
    /// Stable index of member `k`
    pub fn index(&self, k: usize) -> usize {
        self.members[k]
    }
    pub fn kind(&self, k: usize) -> usize {
        self.particles.kind(self.members[k])
    }
    pub fn position(&self, k: usize) -> &'a [f64; 3] {
        self.particles.position(self.members[k])
    }
    pub fn container(&self) -> &'a Container {
        self.container
    }
    /// Minimum-image vector from member `a` to member `b`
    pub fn separation(&self, a: usize, b: usize) -> [f64; 3] {
        self.container.separation(self.position(a), self.position(b))
    }
    pub fn distance_sq(&self, a: usize, b: usize) -> f64 {
        self.container.distance_sq(self.position(a), self.position(b))
    }
    /// Position of member `k` relative to the first member
    pub fn relative(&self, k: usize) -> [f64; 3] {
        self.separation(0, k)
    }
}
