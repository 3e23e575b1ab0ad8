//! Sinks for the contributions produced while visiting interaction groups.
//! When running on several threads every worker owns a private clone, and
//! the clones are folded into the caller's accumulator in thread order.

mod counter;
mod energy;
mod force;
mod virial;

pub use counter::GroupCounter;
pub use energy::EnergySum;
pub use force::ForceSum;
pub use virial::VirialSum;

use crate::potential::{Group, Potential};

pub trait Accumulator: Clone + Send + 'static {
    /// Return to the empty state
    fn reset(&mut self);
    /// Absorb the contribution of one potential acting on one group
    fn accumulate(&mut self, group: &Group<'_>, potential: &dyn Potential);
    /// Add the contents of another accumulator of the same kind
    fn combine(&mut self, other: &Self);
}
