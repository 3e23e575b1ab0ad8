//! Domain decomposition of the cell lattice and the worker pool that
//! evaluates one region per thread.

mod domain;
mod executor;
mod worker;

pub(crate) mod message;

pub use domain::{DomainRegion, Partition};
pub use executor::Executor;
pub(crate) use worker::Worker;
