use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    region::Rect,
    utils::{difference, norm_squared, Axis},
};

/// Boundary conditions for simulation box.
///
/// PP: Periodic (applies to both sides)
/// FF: Fixed boundary, no wraparound
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BC {
    PP,
    FF,
}
impl BC {
    /// Check whether the boundary condition is periodic
    pub fn is_periodic(&self) -> bool {
        matches!(self, BC::PP)
    }
}

/// Simulation box, represented by a rectangular box and boundary conditions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Container {
    rect: Rect,
    bc: [BC; 3],
}
impl Container {
    // Creation

    /// Create a new container from a box and per-axis boundary conditions
    pub fn new(rect: Rect, bc: [BC; 3]) -> Result<Self> {
        if !rect.is_valid() {
            return Err(Error::config(format!(
                "Box bounds should be finite with lo < hi, found {:?}",
                rect
            )));
        }
        Ok(Self { rect, bc })
    }
    /// Create a fully periodic container with its lower corner at the origin
    pub fn periodic(lengths: [f64; 3]) -> Result<Self> {
        Self::new(Rect::from_lengths(lengths), [BC::PP, BC::PP, BC::PP])
    }

    // Getters

    /// Check whether the boundary condition along a given axis is periodic
    pub fn is_periodic(&self, axis: Axis) -> bool {
        self.bc[axis.index()].is_periodic()
    }
    pub fn bc(&self) -> [BC; 3] {
        self.bc
    }
    /// A reference to the rectangular box
    pub fn rect(&self) -> &Rect {
        &self.rect
    }
    pub fn lo(&self) -> [f64; 3] {
        self.rect.lo()
    }
    pub fn hi(&self) -> [f64; 3] {
        self.rect.hi()
    }
    pub fn lengths(&self) -> [f64; 3] {
        self.rect.lengths()
    }

    // Setters

    /// Change the box lengths, keeping the lower corner fixed
    pub fn set_lengths(&mut self, lengths: [f64; 3]) -> Result<()> {
        let mut rect = self.rect.clone();
        rect.set_lengths(lengths);
        if !rect.is_valid() {
            return Err(Error::config(format!(
                "Box lengths should be positive and finite, found {:?}",
                lengths
            )));
        }
        self.rect = rect;
        Ok(())
    }

    // Geometry

    /// Map a coordinate into the box along every periodic axis.
    /// Coordinates along fixed axes are returned unchanged.
    pub fn wrap(&self, coord: &[f64; 3]) -> [f64; 3] {
        let mut out = *coord;
        let lo = self.rect.lo();
        let lengths = self.rect.lengths();
        for axis in Axis::ALL {
            let i = axis.index();
            if !self.is_periodic(axis) {
                continue;
            }
            let mut x = (coord[i] - lo[i]).rem_euclid(lengths[i]);
            // rem_euclid of a tiny negative number can round up to the length itself
            if x >= lengths[i] {
                x = 0.0;
            }
            out[i] = lo[i] + x;
        }
        out
    }

    /// Shortest periodic image of a separation vector.
    ///
    /// ```rust
    /// use jcell::Container;
    ///
    /// let container = Container::periodic([10.0, 10.0, 10.0]).unwrap();
    /// let dr = container.minimum_image(&[9.0, -6.0, 1.0]);
    /// assert!((dr[0] + 1.0).abs() < 1e-12);
    /// assert!((dr[1] - 4.0).abs() < 1e-12);
    /// assert!((dr[2] - 1.0).abs() < 1e-12);
    /// ```
    pub fn minimum_image(&self, dr: &[f64; 3]) -> [f64; 3] {
        let mut out = *dr;
        let lengths = self.rect.lengths();
        for axis in Axis::ALL {
            let i = axis.index();
            if self.is_periodic(axis) {
                out[i] -= lengths[i] * (out[i] / lengths[i]).round();
            }
        }
        out
    }

    /// Minimum-image separation `b - a`
    pub fn separation(&self, a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
        self.minimum_image(&difference(a, b))
    }

    /// Minimum-image squared distance
    pub fn distance_sq(&self, a: &[f64; 3], b: &[f64; 3]) -> f64 {
        norm_squared(&self.separation(a, b))
    }
}
