//! Spatial neighbor decomposition and threaded accumulation of potential
//! contributions for particle simulations.
//!
//! Particles live in a periodic (or partly fixed) box. A cell lattice keeps
//! them sorted in space, neighbor lists are derived from it, and a
//! dispatcher hands every interaction group to the potentials that apply.
//! All-particle calculations can be split over worker threads, one slab of
//! the lattice each.

pub mod accumulator;
pub mod container;
pub mod dispatch;
pub mod error;
pub mod neighbor;
pub mod parallel;
pub mod particles;
pub mod potential;
pub mod prelude;
pub mod region;
pub mod settings;
pub mod simulation;
pub mod utils;

pub use accumulator::{Accumulator, EnergySum, ForceSum, GroupCounter, VirialSum};
pub use container::{Container, BC};
pub use dispatch::{Direction, Directive, Dispatcher, Target};
pub use error::{Error, Result};
pub use neighbor::{CellLattice, NeighborListManager};
pub use parallel::{DomainRegion, Executor, Partition};
pub use particles::Particles;
pub use potential::{Arity, Group, Potential, PotentialRegistry};
pub use settings::Settings;
pub use simulation::{Simulation, State};
pub use utils::{Axis, Types};
