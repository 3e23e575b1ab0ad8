use super::{Arity, Group, Potential};
use crate::{
    error::{Error, Result},
    utils::{norm_squared, scaled, Types},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LJCutCoeff {
    sigma: f64,
    epsilon: f64,
    rcut: f64,
    sigma6: f64,
    rcut2: f64,
    prefactor: f64, // = -24 epsilon * sigma^6
    shift: f64,     // energy at rcut, subtracted so that U(rcut) = 0
}
impl LJCutCoeff {
    pub fn new(sigma: f64, epsilon: f64, rcut: f64) -> Self {
        let sigma6 = sigma * sigma * sigma * sigma * sigma * sigma;
        let rcut2 = rcut * rcut;
        let rcut6 = rcut2 * rcut2 * rcut2;
        let shift = if rcut > 0.0 {
            4.0 * epsilon * sigma6 / rcut6 * (sigma6 / rcut6 - 1.0)
        } else {
            0.0
        };
        Self {
            sigma,
            epsilon,
            rcut,
            sigma6,
            rcut2,
            prefactor: -24.0 * epsilon * sigma6,
            shift,
        }
    }
    pub fn sigma(&self) -> f64 {
        self.sigma
    }
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
    pub fn rcut(&self) -> f64 {
        self.rcut
    }
}

/// Lennard-Jones 12-6 potential, shifted to zero at the cutoff
#[derive(Clone, Debug)]
pub struct LJCut {
    num_types: usize,
    force_cutoff: f64,
    coeffs: Vec<LJCutCoeff>,
    coeff_set: Vec<bool>,
}
impl LJCut {
    pub fn new(num_types: usize, force_cutoff: f64) -> Self {
        assert!(
            force_cutoff > 0.0,
            "Force cutoff should be positive, found {}",
            force_cutoff
        );
        let new_len = num_types * num_types;
        Self {
            num_types,
            force_cutoff,
            coeffs: vec![LJCut::default_coeff(); new_len],
            coeff_set: vec![false; new_len],
        }
    }
    pub fn set_coeff(
        &mut self,
        type_i: impl Into<Types>,
        type_j: impl Into<Types>,
        sigma: f64,
        epsilon: f64,
        rcut: f64,
    ) -> Result<()> {
        let itypes = type_i.into().to_vec();
        let jtypes = type_j.into().to_vec();
        if let Some(t) = itypes
            .iter()
            .chain(jtypes.iter())
            .find(|&&t| t >= self.num_types)
        {
            return Err(Error::config(format!(
                "Particle kind {} is out of range for {} kinds",
                t, self.num_types
            )));
        }
        if rcut > self.force_cutoff {
            return Err(Error::config(format!(
                "Pair cutoff {} exceeds the force cutoff {}",
                rcut, self.force_cutoff
            )));
        }

        let coeff = LJCutCoeff::new(sigma, epsilon, rcut);
        for &i in &itypes {
            for &j in &jtypes {
                for index in [self.type_idx(i, j), self.type_idx(j, i)] {
                    self.coeff_set[index] = true;
                    self.coeffs[index] = coeff;
                }
            }
        }
        Ok(())
    }
    pub fn coeff(&self, type_i: usize, type_j: usize) -> &LJCutCoeff {
        &self.coeffs[self.type_idx(type_i, type_j)]
    }
    /// Whether coefficients were given for this pair of kinds
    pub fn is_set(&self, type_i: usize, type_j: usize) -> bool {
        self.coeff_set[self.type_idx(type_i, type_j)]
    }
    pub fn all_set(&self) -> bool {
        self.coeff_set.iter().all(|&x| x)
    }
    pub fn num_types(&self) -> usize {
        self.num_types
    }
    fn type_idx(&self, type_i: usize, type_j: usize) -> usize {
        type_i * self.num_types + type_j
    }
    fn default_coeff() -> LJCutCoeff {
        LJCutCoeff::new(0.0, 0.0, 0.0)
    }
}

impl Potential for LJCut {
    fn arity(&self) -> Arity {
        Arity::TwoBody
    }
    fn range(&self) -> f64 {
        self.force_cutoff
    }
    fn energy(&self, group: &Group<'_>) -> f64 {
        // U(r) = 4 eps ((sig/r)^12 - (sig/r)^6) - U(rcut)
        let (kind_i, kind_j) = (group.kind(0), group.kind(1));
        if !self.is_set(kind_i, kind_j) {
            return 0.0;
        }
        let coeff = self.coeff(kind_i, kind_j);
        let r2 = group.distance_sq(0, 1);
        if r2 > coeff.rcut2 {
            return 0.0;
        }
        let r6 = r2 * r2 * r2;
        4.0 * coeff.epsilon * coeff.sigma6 / r6 * (coeff.sigma6 / r6 - 1.0) - coeff.shift
    }
    fn gradient(&self, group: &Group<'_>, gradient: &mut [[f64; 3]]) {
        // dU/dr_j = r_ij * -24 eps sig^6 / r^8 (2 (sig/r)^6 - 1), with r_ij = r_j - r_i
        let (kind_i, kind_j) = (group.kind(0), group.kind(1));
        let coeff = self.coeff(kind_i, kind_j);
        let r = group.separation(0, 1);
        let r2 = norm_squared(&r);
        if !self.is_set(kind_i, kind_j) || r2 > coeff.rcut2 {
            gradient[0] = [0.0; 3];
            gradient[1] = [0.0; 3];
            return;
        }
        let r6 = r2 * r2 * r2;
        let g_mag = coeff.prefactor / r6 / r2 * (2.0 * coeff.sigma6 / r6 - 1.0);
        gradient[1] = scaled(&r, g_mag);
        gradient[0] = scaled(&r, -g_mag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{particles::Particles, Container};

    fn pair(distance: f64) -> (Particles, Container) {
        let container = Container::periodic([20.0; 3]).unwrap();
        let mut particles = Particles::new();
        particles.add(0, [5.0, 5.0, 5.0]);
        particles.add(0, [5.0 + distance, 5.0, 5.0]);
        (particles, container)
    }

    fn lj() -> LJCut {
        let mut lj = LJCut::new(1, 2.5);
        lj.set_coeff(0, 0, 1.0, 1.0, 2.5).unwrap();
        lj
    }

    #[test]
    fn energy_is_shifted_to_zero_at_cutoff() {
        let lj = lj();
        let (particles, container) = pair(2.5);
        let group = Group::new(&[0, 1], &particles, &container);
        assert!(lj.energy(&group).abs() < 1e-12);

        let (particles, container) = pair(2.0f64.powf(1.0 / 6.0));
        let group = Group::new(&[0, 1], &particles, &container);
        let expected = -1.0 - lj.coeff(0, 0).shift;
        assert!((lj.energy(&group) - expected).abs() < 1e-12);
    }

    #[test]
    fn gradient_matches_finite_difference() {
        let lj = lj();
        let d = 1.1;
        let h = 1e-6;
        let (particles, container) = pair(d);
        let group = Group::new(&[0, 1], &particles, &container);
        let mut gradient = [[0.0; 3]; 2];
        lj.gradient(&group, &mut gradient);

        let (p_plus, c) = pair(d + h);
        let (p_minus, _) = pair(d - h);
        let e_plus = lj.energy(&Group::new(&[0, 1], &p_plus, &c));
        let e_minus = lj.energy(&Group::new(&[0, 1], &p_minus, &c));
        let numeric = (e_plus - e_minus) / (2.0 * h);
        assert!((gradient[1][0] - numeric).abs() < 1e-5 * numeric.abs().max(1.0));
        assert_eq!(gradient[0][0], -gradient[1][0]);
    }

    #[test]
    fn rejects_unknown_kinds_and_long_cutoffs() {
        let mut lj = LJCut::new(2, 2.5);
        assert!(lj.set_coeff(0, 2, 1.0, 1.0, 2.5).is_err());
        assert!(lj.set_coeff(0, 1, 1.0, 1.0, 3.0).is_err());
        lj.set_coeff(0..2, 0..2, 1.0, 1.0, 2.5).unwrap();
        assert!(lj.all_set());
    }

    #[test]
    fn unset_kinds_do_not_interact() {
        let container = Container::periodic([20.0; 3]).unwrap();
        let mut particles = Particles::new();
        particles.add(0, [5.0; 3]);
        particles.add(1, [5.0; 3]);
        particles.add(1, [5.0; 3]);

        let mut lj = LJCut::new(2, 2.5);
        lj.set_coeff(0, 0, 1.0, 1.0, 2.5).unwrap();
        assert!(!lj.is_set(0, 1) && !lj.is_set(1, 1));
        assert!(!lj.all_set());
        for members in [[0, 1], [1, 2]] {
            let group = Group::new(&members, &particles, &container);
            assert_eq!(lj.energy(&group), 0.0);
            let mut gradient = [[1.0; 3]; 2];
            lj.gradient(&group, &mut gradient);
            assert_eq!(gradient, [[0.0; 3]; 2]);
        }
    }
}
