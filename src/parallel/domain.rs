use crate::{
    error::{Error, Result},
    neighbor::CellLattice,
    utils::{Axis, Index},
};

/// Contiguous slab of lattice cells handled by one worker
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainRegion {
    index: usize,
    layers: [usize; 2],
    cells: Vec<usize>,
}
impl DomainRegion {
    /// Position of the region, and of its worker, in thread order
    pub fn index(&self) -> usize {
        self.index
    }
    /// Half-open range of cell layers along the partition axis
    pub fn layers(&self) -> [usize; 2] {
        self.layers
    }
    /// Linear cell indices, ascending
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }
    /// Particles currently in the region's cells, ascending
    pub fn particles(&self, lattice: &CellLattice) -> Vec<usize> {
        let mut owned: Vec<usize> = self
            .cells
            .iter()
            .flat_map(|&c| lattice.occupants(c).iter().copied())
            .collect();
        owned.sort_unstable();
        owned
    }
    pub fn num_particles(&self, lattice: &CellLattice) -> usize {
        self.cells.iter().map(|&c| lattice.occupants(c).len()).sum()
    }
}

/// Static split of a cell lattice into slabs along its longest axis.
/// Layers that do not divide evenly go to the first regions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    num_cells: [usize; 3],
    axis: Axis,
    regions: Vec<DomainRegion>,
}
impl Partition {
    pub fn new(num_cells: [usize; 3], num_regions: usize) -> Result<Self> {
        let axis = longest_axis(&num_cells);
        let layers = num_cells[axis.index()];
        if num_regions == 0 || num_regions > layers {
            return Err(Error::TooManyThreads {
                threads: num_regions,
                cells: layers,
            });
        }

        let base = layers / num_regions;
        let remainder = layers % num_regions;
        let mut regions: Vec<DomainRegion> = Vec::with_capacity(num_regions);
        let mut lo = 0;
        for index in 0..num_regions {
            let hi = lo + base + usize::from(index < remainder);
            regions.push(DomainRegion {
                index,
                layers: [lo, hi],
                cells: Vec::new(),
            });
            lo = hi;
        }

        let total = num_cells[0] * num_cells[1] * num_cells[2];
        let bounds = [base + 1, base, remainder];
        for cell in 0..total {
            let layer = Index::new(cell, num_cells).to_3d()[axis.index()];
            regions[region_of_layer(layer, &bounds)].cells.push(cell);
        }

        Ok(Self {
            num_cells,
            axis,
            regions,
        })
    }
    pub fn for_lattice(lattice: &CellLattice, num_regions: usize) -> Result<Self> {
        Self::new(lattice.num_cells(), num_regions)
    }

    pub fn num_cells(&self) -> [usize; 3] {
        self.num_cells
    }
    pub fn axis(&self) -> Axis {
        self.axis
    }
    pub fn regions(&self) -> &[DomainRegion] {
        &self.regions
    }
    pub fn num_regions(&self) -> usize {
        self.regions.len()
    }
    /// Whether the partition was made for a lattice of this shape
    pub fn fits(&self, lattice: &CellLattice) -> bool {
        self.num_cells == lattice.num_cells()
    }
    pub fn region_of_cell(&self, cell: usize) -> usize {
        let layer = Index::new(cell, self.num_cells).to_3d()[self.axis.index()];
        self.regions
            .partition_point(|r| r.layers[1] <= layer)
    }
}

/// Longest axis in cells. Ties go to the earlier axis.
fn longest_axis(num_cells: &[usize; 3]) -> Axis {
    let mut best = Axis::X;
    for axis in Axis::ALL {
        if num_cells[axis.index()] > num_cells[best.index()] {
            best = axis;
        }
    }
    best
}

/// Region holding `layer`, given `[wide, narrow, num_wide]`: the first
/// `num_wide` regions are `wide` layers thick, the rest `narrow`
fn region_of_layer(layer: usize, bounds: &[usize; 3]) -> usize {
    let [wide, narrow, num_wide] = *bounds;
    let split = wide * num_wide;
    if layer < split {
        layer / wide
    } else {
        num_wide + (layer - split) / narrow
    }
}
