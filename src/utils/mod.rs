mod axis;
/// Small vector helpers on `[f64; 3]`
pub mod computations;
pub mod indices;
pub mod types;

pub use axis::Axis;
pub use computations::*;
pub use indices::Index;
pub use types::Types;
