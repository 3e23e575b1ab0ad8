pub mod lattice;
pub mod neighbor_list;

pub use lattice::CellLattice;
pub use neighbor_list::NeighborListManager;
