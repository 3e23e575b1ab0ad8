use thiserror::Error;

use crate::utils::Axis;

/// Error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid parameters given at setup time
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The box shrank below what the cell lattice was built for
    #[error(
        "Cell size {cell_size} along {axis:?} is smaller than the required {required}; \
         the cell lattice must be re-created"
    )]
    CellTooSmall {
        axis: Axis,
        cell_size: f64,
        required: f64,
    },

    /// A registered potential reaches further than the neighbor lists
    #[error("Potential range {potential_range} exceeds the neighbor range {neighbor_range}")]
    RangeExceeded {
        potential_range: f64,
        neighbor_range: f64,
    },

    /// Thread count does not fit the lattice along the partition axis
    #[error("Cannot split {cells} cells into {threads} regions")]
    TooManyThreads { threads: usize, cells: usize },

    /// Index does not name a live particle
    #[error("No particle with index {0}")]
    UnknownParticle(usize),

    /// A worker failed while evaluating its region
    #[error("Worker {thread} failed: {message}")]
    Worker { thread: usize, message: String },

    /// A previous worker failure left the executor unusable
    #[error("Executor is poisoned by an earlier worker failure; configure it again")]
    Poisoned,

    /// The shared state is still held by a worker
    #[error("Simulation state is still shared with worker threads")]
    StateShared,

    /// A worker channel closed unexpectedly
    #[error("Worker channel disconnected")]
    Disconnected,
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
