/// A linear index into an `nx * ny * nz` array laid out x-major
/// (z varies fastest), together with the array bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Index {
    idx: usize,
    bounds: [usize; 3],
}
impl Index {
    pub fn new(idx: usize, bounds: [usize; 3]) -> Self {
        assert!(
            idx < bounds[0] * bounds[1] * bounds[2],
            "Index {} should be less than the total number {}",
            idx,
            bounds[0] * bounds[1] * bounds[2]
        );
        Self { idx, bounds }
    }
    pub fn from_3d(indices: &[usize; 3], bounds: &[usize; 3]) -> Self {
        let [x, y, z] = *indices;
        let [nx, ny, nz] = *bounds;
        assert!(
            x < nx && y < ny && z < nz,
            "Multidimensional indices {:?} should be smaller than respective lengths {:?}",
            indices,
            bounds
        );
        let idx = x * ny * nz + y * nz + z;
        Self {
            idx,
            bounds: *bounds,
        }
    }
    pub fn to_3d(&self) -> [usize; 3] {
        let z = self.idx % self.bounds[2];
        let q = self.idx / self.bounds[2];
        let y = q % self.bounds[1];
        let x = q / self.bounds[1];
        [x, y, z]
    }
    pub fn idx(&self) -> usize {
        self.idx
    }
    pub fn bounds(&self) -> [usize; 3] {
        self.bounds
    }
}
