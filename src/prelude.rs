pub use super::accumulator::{Accumulator, EnergySum, ForceSum, GroupCounter, VirialSum};
pub use super::container::{Container, BC};
pub use super::dispatch::{Direction, Directive};
pub use super::error::{Error, Result};
pub use super::potential::{Arity, Group, HardSphere, LJCut, Potential};
pub use super::region::{Rect, Region};
pub use super::settings::Settings;
pub use super::simulation::Simulation;
pub use super::utils::{Axis, Types};
