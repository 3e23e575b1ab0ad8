use log::debug;

use crate::{
    error::{Error, Result},
    particles::Particles,
    utils::{Axis, Index},
    Container,
};

/// Regular grid of cells covering the simulation box. Every cell is at least
/// `min_cell_size` wide. Each cell caches its neighborhood: the cells that
/// can hold a partner within `range` of any point inside it. With the
/// default `range == min_cell_size` that is the cell and its direct
/// neighbors.
#[derive(Clone, Debug)]
pub struct CellLattice {
    num_cells: [usize; 3],
    min_cell_size: f64,
    range: f64,
    reach: [usize; 3],
    periodic: [bool; 3],
    cells: Vec<Vec<usize>>,
    cell_of: Vec<Option<usize>>,
    neighborhoods: Vec<Vec<usize>>,
}
impl CellLattice {
    pub fn new(container: &Container, min_cell_size: f64) -> Result<Self> {
        Self::with_range(container, min_cell_size, min_cell_size)
    }
    /// Lattice whose neighborhoods cover `range`, which may span several
    /// cells when `min_cell_size` is smaller
    pub fn with_range(container: &Container, min_cell_size: f64, range: f64) -> Result<Self> {
        if !(min_cell_size.is_finite() && min_cell_size > 0.0) {
            return Err(Error::config(format!(
                "Cell size should be positive, found {}",
                min_cell_size
            )));
        }
        if !(range.is_finite() && range > 0.0) {
            return Err(Error::config(format!(
                "Neighborhood range should be positive, found {}",
                range
            )));
        }
        let mut lattice = Self {
            num_cells: [1; 3],
            min_cell_size,
            range,
            reach: [1; 3],
            periodic: [false; 3],
            cells: Vec::new(),
            cell_of: Vec::new(),
            neighborhoods: Vec::new(),
        };
        lattice.recreate(container)?;
        Ok(lattice)
    }

    /// Re-create the cells for the current box geometry. All occupants are
    /// dropped; call `rebuild` afterwards.
    pub fn recreate(&mut self, container: &Container) -> Result<()> {
        let lengths = container.lengths();
        for axis in Axis::ALL {
            let i = axis.index();
            let n = (lengths[i] / self.min_cell_size).floor();
            self.num_cells[i] = if n >= 1.0 { n as usize } else { 1 };
            self.periodic[i] = container.is_periodic(axis);
        }
        let cell_size = self.cell_size(container);
        for i in 0..3 {
            self.reach[i] = layers_within(self.range, cell_size[i]).max(1);
        }
        let total = self.total_cells();
        // occupant vectors are recycled rather than reallocated
        self.cells.iter_mut().for_each(Vec::clear);
        self.cells.resize_with(total, Vec::new);
        self.cell_of.iter_mut().for_each(|c| *c = None);

        self.neighborhoods = (0..total)
            .map(|cell| self.neighbor_cells(cell, self.range, container))
            .collect();
        debug!(
            "Created cell lattice {:?} with minimum cell size {}, reaching {:?} cells",
            self.num_cells, self.min_cell_size, self.reach
        );
        Ok(())
    }

    // Getters

    pub fn num_cells(&self) -> [usize; 3] {
        self.num_cells
    }
    pub fn total_cells(&self) -> usize {
        self.num_cells[0] * self.num_cells[1] * self.num_cells[2]
    }
    pub fn min_cell_size(&self) -> f64 {
        self.min_cell_size
    }
    /// Distance covered by the cached neighborhoods
    pub fn range(&self) -> f64 {
        self.range
    }
    pub fn cell_size(&self, container: &Container) -> [f64; 3] {
        let lengths = container.lengths();
        [
            lengths[0] / self.num_cells[0] as f64,
            lengths[1] / self.num_cells[1] as f64,
            lengths[2] / self.num_cells[2] as f64,
        ]
    }
    pub fn cell_coords(&self, cell: usize) -> [usize; 3] {
        Index::new(cell, self.num_cells).to_3d()
    }
    pub fn cell_index(&self, coords: &[usize; 3]) -> usize {
        Index::from_3d(coords, &self.num_cells).idx()
    }
    /// Cell currently holding a particle
    pub fn cell_of(&self, index: usize) -> Option<usize> {
        self.cell_of.get(index).copied().flatten()
    }
    pub fn occupants(&self, cell: usize) -> &[usize] {
        &self.cells[cell]
    }
    /// Cells within `range` of `cell`, including itself
    pub fn neighborhood(&self, cell: usize) -> &[usize] {
        &self.neighborhoods[cell]
    }

    /// Fails if the box changed such that the cached neighborhoods could miss
    /// partners. The lattice is never adjusted silently.
    pub fn check(&self, container: &Container) -> Result<()> {
        let cell_size = self.cell_size(container);
        for axis in Axis::ALL {
            let i = axis.index();
            if container.is_periodic(axis) != self.periodic[i] {
                return Err(Error::config(format!(
                    "Boundary condition along {:?} changed since the cell lattice was created",
                    axis
                )));
            }
            if self.num_cells[i] > 1 && cell_size[i] < self.min_cell_size * (1.0 - 1e-12) {
                return Err(Error::CellTooSmall {
                    axis,
                    cell_size: cell_size[i],
                    required: self.min_cell_size,
                });
            }
            let n = self.num_cells[i];
            let reach = self.reach[i];
            let covers_axis = if self.periodic[i] {
                reach.saturating_mul(2).saturating_add(1) >= n
            } else {
                reach + 1 >= n
            };
            if !covers_axis && layers_within(self.range, cell_size[i]) > reach {
                return Err(Error::CellTooSmall {
                    axis,
                    cell_size: cell_size[i],
                    required: self.range / reach as f64,
                });
            }
        }
        Ok(())
    }

    /// Cell covering a position, after wrapping along periodic axes.
    /// Positions outside a fixed boundary go to the edge cell.
    pub fn cell_index_of(&self, position: &[f64; 3], container: &Container) -> usize {
        let wrapped = container.wrap(position);
        let lo = container.lo();
        let cell_size = self.cell_size(container);
        let mut coords = [0usize; 3];
        for i in 0..3 {
            let n = self.num_cells[i] as i64;
            let c = ((wrapped[i] - lo[i]) / cell_size[i]).floor() as i64;
            coords[i] = if self.periodic[i] {
                c.rem_euclid(n) as usize
            } else {
                c.clamp(0, n - 1) as usize
            };
        }
        self.cell_index(&coords)
    }

    /// Place a particle in the cell covering its position
    pub fn assign(
        &mut self,
        index: usize,
        position: &[f64; 3],
        container: &Container,
    ) -> Result<usize> {
        self.check(container)?;
        Ok(self.place(index, position, container))
    }

    pub fn remove(&mut self, index: usize) {
        if let Some(cell) = self.cell_of(index) {
            let occupants = &mut self.cells[cell];
            if let Some(pos) = occupants.iter().position(|&i| i == index) {
                occupants.swap_remove(pos);
            }
            self.cell_of[index] = None;
        }
    }

    /// Re-assign every live particle to its current cell
    pub fn rebuild(&mut self, particles: &Particles, container: &Container) -> Result<()> {
        self.check(container)?;
        self.cells.iter_mut().for_each(Vec::clear);
        self.cell_of.clear();
        self.cell_of.resize(particles.capacity(), None);
        for i in particles.iter() {
            self.place(i, particles.position(i), container);
        }
        Ok(())
    }

    /// Cells that could hold a particle within `range` of any point of
    /// `cell`, sorted ascending. Periodic axes wrap to the opposite edge,
    /// fixed axes are clipped.
    pub fn neighbor_cells(&self, cell: usize, range: f64, container: &Container) -> Vec<usize> {
        let coords = self.cell_coords(cell);
        let cell_size = self.cell_size(container);

        let per_axis: Vec<Vec<usize>> = (0..3)
            .map(|i| {
                let n = self.num_cells[i];
                let reach = layers_within(range, cell_size[i]);
                let c = coords[i] as i64;
                let mut cs: Vec<usize> = if self.periodic[i] {
                    if reach.saturating_mul(2).saturating_add(1) >= n {
                        (0..n).collect()
                    } else {
                        (-(reach as i64)..=reach as i64)
                            .map(|d| (c + d).rem_euclid(n as i64) as usize)
                            .collect()
                    }
                } else {
                    let lo = coords[i].saturating_sub(reach);
                    let hi = coords[i].saturating_add(reach).min(n - 1);
                    (lo..=hi).collect()
                };
                cs.sort_unstable();
                cs
            })
            .collect();

        let mut out = Vec::with_capacity(per_axis[0].len() * per_axis[1].len() * per_axis[2].len());
        for &x in &per_axis[0] {
            for &y in &per_axis[1] {
                for &z in &per_axis[2] {
                    out.push(self.cell_index(&[x, y, z]));
                }
            }
        }
        out
    }

    fn place(&mut self, index: usize, position: &[f64; 3], container: &Container) -> usize {
        let cell = self.cell_index_of(position, container);
        if self.cell_of(index) == Some(cell) {
            return cell;
        }
        self.remove(index);
        if self.cell_of.len() <= index {
            self.cell_of.resize(index + 1, None);
        }
        self.cells[cell].push(index);
        self.cell_of[index] = Some(cell);
        cell
    }
}

/// Layers of cells of the given width needed to cover `range`, with a
/// little slack for rounding in `length / num_cells`
fn layers_within(range: f64, width: f64) -> usize {
    (range / (width * (1.0 + 1e-12))).ceil().max(0.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{region::Rect, BC};

    fn cube(length: f64) -> Container {
        Container::periodic([length; 3]).unwrap()
    }

    #[test]
    fn cells_are_at_least_the_requested_size() {
        let container = Container::periodic([10.0, 7.0, 2.0]).unwrap();
        let lattice = CellLattice::new(&container, 2.4).unwrap();
        assert_eq!(lattice.num_cells(), [4, 2, 1]);
        assert_eq!(lattice.total_cells(), 8);
        let size = lattice.cell_size(&container);
        assert!(size[0] >= 2.4 && size[1] >= 2.4);
        // a single cell spans the whole axis, whatever its width
        assert_eq!(size[2], 2.0);
    }

    #[test]
    fn assigns_wrapped_positions() {
        let container = cube(10.0);
        let mut lattice = CellLattice::new(&container, 2.5).unwrap();
        let cell = lattice.assign(0, &[-0.1, 10.1, 5.0], &container).unwrap();
        assert_eq!(lattice.cell_coords(cell), [3, 0, 2]);
        assert_eq!(lattice.cell_of(0), Some(cell));
        assert_eq!(lattice.occupants(cell), &[0]);

        // moving to another cell leaves the old one empty
        let moved = lattice.assign(0, &[1.0, 1.0, 1.0], &container).unwrap();
        assert_ne!(moved, cell);
        assert!(lattice.occupants(cell).is_empty());
        assert_eq!(lattice.occupants(moved), &[0]);

        lattice.remove(0);
        assert_eq!(lattice.cell_of(0), None);
        assert!(lattice.occupants(moved).is_empty());
    }

    #[test]
    fn edge_cells_see_the_opposite_edge() {
        let container = cube(10.0);
        let lattice = CellLattice::new(&container, 2.0).unwrap();
        assert_eq!(lattice.num_cells(), [5, 5, 5]);
        let corner = lattice.cell_index(&[0, 0, 0]);
        let cells = lattice.neighbor_cells(corner, 2.0, &container);
        assert_eq!(cells.len(), 27);
        assert!(cells.contains(&lattice.cell_index(&[4, 4, 4])));
        assert!(cells.contains(&lattice.cell_index(&[4, 0, 1])));
        assert!(!cells.contains(&lattice.cell_index(&[2, 0, 0])));
        assert_eq!(lattice.neighborhood(corner), cells.as_slice());
    }

    #[test]
    fn small_lattices_do_not_repeat_cells() {
        let container = cube(5.0);
        let lattice = CellLattice::new(&container, 2.0).unwrap();
        assert_eq!(lattice.num_cells(), [2, 2, 2]);
        for cell in 0..lattice.total_cells() {
            assert_eq!(lattice.neighbor_cells(cell, 2.0, &container), (0..8).collect::<Vec<_>>());
        }
    }

    #[test]
    fn fixed_axes_are_clipped() {
        let rect = Rect::from_lengths([10.0, 10.0, 10.0]);
        let container = Container::new(rect, [BC::FF, BC::PP, BC::PP]).unwrap();
        let lattice = CellLattice::new(&container, 2.0).unwrap();
        let corner = lattice.cell_index(&[0, 2, 2]);
        let cells = lattice.neighbor_cells(corner, 2.0, &container);
        assert_eq!(cells.len(), 18);
        assert!(cells.iter().all(|&c| lattice.cell_coords(c)[0] <= 1));

        let mut lattice = lattice;
        let cell = lattice.assign(0, &[-3.0, 1.0, 1.0], &container).unwrap();
        assert_eq!(lattice.cell_coords(cell)[0], 0);
    }

    #[test]
    fn longer_ranges_reach_further() {
        let container = cube(20.0);
        let lattice = CellLattice::new(&container, 2.0).unwrap();
        let cells = lattice.neighbor_cells(0, 4.5, &container);
        // reach of three cells per side
        assert_eq!(cells.len(), 7 * 7 * 7);
    }

    #[test]
    fn shrinking_box_is_a_configuration_error() {
        let mut container = cube(10.0);
        let mut lattice = CellLattice::new(&container, 2.5).unwrap();
        container.set_lengths([9.0, 10.0, 10.0]).unwrap();
        let err = lattice.assign(0, &[1.0, 1.0, 1.0], &container).unwrap_err();
        assert!(matches!(err, Error::CellTooSmall { axis: Axis::X, .. }));

        lattice.recreate(&container).unwrap();
        assert_eq!(lattice.num_cells(), [3, 4, 4]);
        assert!(lattice.assign(0, &[1.0, 1.0, 1.0], &container).is_ok());
    }

    #[test]
    fn fine_cells_widen_the_neighborhood() {
        let mut container = cube(7.8);
        let lattice = CellLattice::with_range(&container, 1.0, 2.1).unwrap();
        assert_eq!(lattice.num_cells(), [7, 7, 7]);
        // reach of two cells per side
        assert_eq!(lattice.neighborhood(0).len(), 5 * 5 * 5);

        // cells are still wider than 1.0, but 2.1 now needs a third layer
        container.set_lengths([7.2, 7.8, 7.8]).unwrap();
        assert!(matches!(
            lattice.check(&container),
            Err(Error::CellTooSmall { axis: Axis::X, .. })
        ));
    }

    #[test]
    fn growing_box_keeps_lattice_valid() {
        let mut container = cube(10.0);
        let lattice = CellLattice::new(&container, 2.5).unwrap();
        container.set_lengths([12.0, 12.0, 12.0]).unwrap();
        assert!(lattice.check(&container).is_ok());
    }

    #[test]
    fn rebuild_puts_every_particle_in_exactly_one_cell() {
        let container = cube(10.0);
        let mut lattice = CellLattice::new(&container, 1.0).unwrap();
        let mut particles = Particles::new();
        for i in 0..50 {
            let x = i as f64 * 0.37;
            particles.add(0, [x, 2.0 * x, -x]);
        }
        particles.remove(10).unwrap();
        lattice.rebuild(&particles, &container).unwrap();

        let mut seen: Vec<usize> = (0..lattice.total_cells())
            .flat_map(|c| lattice.occupants(c).to_vec())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, particles.iter().collect::<Vec<_>>());
        for i in particles.iter() {
            let cell = lattice.cell_of(i).unwrap();
            assert_eq!(cell, lattice.cell_index_of(particles.position(i), &container));
        }
        assert_eq!(lattice.cell_of(10), None);
    }
}
