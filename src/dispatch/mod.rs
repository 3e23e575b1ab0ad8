//! Walks particles and their neighbor lists, handing every interaction
//! group to the potentials that apply to it.

mod directive;
mod dispatcher;

pub use directive::{Direction, Directive, Target};
pub use dispatcher::Dispatcher;
