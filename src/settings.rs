use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Engine parameters supplied by the owning simulation setup
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Longest interaction range of any registered potential
    pub range: f64,
    /// Extra radius added to `range` when building neighbor lists
    pub skin: f64,
    /// If false, every notified displacement forces a rebuild
    pub check: bool,
    /// Number of worker threads, one per domain region
    pub num_threads: usize,
    /// Minimum cell width. Defaults to the neighbor distance; smaller cells
    /// give more regions to split across threads.
    pub cell_size: Option<f64>,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            range: 2.5,
            skin: 0.3,
            check: true,
            num_threads: 1,
            cell_size: None,
        }
    }
}
impl Settings {
    pub fn new(range: f64, skin: f64) -> Self {
        Self {
            range,
            skin,
            ..Self::default()
        }
    }
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = Some(cell_size);
        self
    }
    /// Cutoff used when building neighbor lists
    pub fn neighbor_distance(&self) -> f64 {
        self.range + self.skin
    }
    pub fn min_cell_size(&self) -> f64 {
        self.cell_size.unwrap_or_else(|| self.neighbor_distance())
    }
    pub fn validate(&self) -> Result<()> {
        if !(self.range.is_finite() && self.range > 0.0) {
            return Err(Error::config(format!(
                "Interaction range should be positive, found {}",
                self.range
            )));
        }
        if !(self.skin.is_finite() && self.skin >= 0.0) {
            return Err(Error::config(format!(
                "Skin distance should be non-negative, found {}",
                self.skin
            )));
        }
        if let Some(cell_size) = self.cell_size {
            if !(cell_size.is_finite() && cell_size > 0.0) {
                return Err(Error::config(format!(
                    "Cell size should be positive, found {}",
                    cell_size
                )));
            }
        }
        if self.num_threads == 0 {
            return Err(Error::config("Thread count should be at least 1"));
        }
        Ok(())
    }
}
