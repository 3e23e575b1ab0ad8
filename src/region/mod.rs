pub mod rect;
pub use rect::Rect;

use rand::Rng;

/// A region of space that particles can be placed in
pub trait Region {
    fn contains(&self, coord: &[f64; 3]) -> bool;
    /// Uniformly random coordinate inside the region
    fn random_coord<R: Rng + ?Sized>(&self, rng: &mut R) -> [f64; 3];
}
