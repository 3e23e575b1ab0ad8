use super::{Arity, Group, Potential};

/// Hard spheres: infinite energy on overlap, zero otherwise
#[derive(Clone, Copy, Debug)]
pub struct HardSphere {
    sigma: f64,
    sigma2: f64,
}
impl HardSphere {
    pub fn new(sigma: f64) -> Self {
        assert!(sigma > 0.0, "Diameter should be positive, found {}", sigma);
        Self {
            sigma,
            sigma2: sigma * sigma,
        }
    }
    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}
impl Potential for HardSphere {
    fn arity(&self) -> Arity {
        Arity::TwoBody
    }
    fn range(&self) -> f64 {
        self.sigma
    }
    fn energy(&self, group: &Group<'_>) -> f64 {
        if group.distance_sq(0, 1) < self.sigma2 {
            f64::INFINITY
        } else {
            0.0
        }
    }
}
