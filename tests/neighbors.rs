mod common;

use common::*;
use jcell::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn missing_partners(sim: &Simulation) -> Vec<(usize, usize)> {
    let cutoff = sim.neighbors().neighbor_distance();
    let particles = sim.particles();
    let mut missing = Vec::new();
    for i in particles.iter() {
        for j in particles.iter() {
            if i == j {
                continue;
            }
            let d2 = sim
                .container()
                .distance_sq(particles.position(i), particles.position(j));
            if d2 <= cutoff * cutoff && !sim.neighbors().neighbors(i).contains(&j) {
                missing.push((i, j));
            }
        }
    }
    missing
}

/// Every live particle sits in exactly one cell, the one covering its position
fn assert_cells_match(sim: &Simulation) {
    let lattice = sim.neighbors().lattice();
    let mut placed = 0;
    for cell in 0..lattice.total_cells() {
        for &i in lattice.occupants(cell) {
            assert!(sim.particles().is_live(i), "{} is not live", i);
            assert_eq!(lattice.cell_of(i), Some(cell));
            assert_eq!(
                lattice.cell_index_of(sim.particles().position(i), sim.container()),
                cell
            );
            placed += 1;
        }
    }
    assert_eq!(placed, sim.particles().len());
}

#[test]
fn cells_follow_particles_between_rebuilds() {
    let container = Container::periodic([10.0; 3]).unwrap();
    let mut sim = Simulation::new(container, Settings::new(2.0, 0.6)).unwrap();
    random_particles(&mut sim, 40, 24);
    let i = sim.add_particle(0, [6.6, 5.0, 5.0]).unwrap();
    sim.potentials_mut().unwrap().add_pair(0, 0, lj(2.0)).unwrap();
    sim.energy().unwrap();
    assert_eq!(sim.neighbors().rebuild_count(), 1);
    assert_cells_match(&sim);

    let lattice = sim.neighbors().lattice();
    assert_eq!(lattice.num_cells(), [3, 3, 3]);
    assert_eq!(lattice.cell_coords(lattice.cell_of(i).unwrap()), [1, 1, 1]);

    // across a cell face, well within the skin
    sim.displace(i, [0.1, 0.0, 0.0]).unwrap();
    assert!(!sim.neighbors().is_stale());
    let lattice = sim.neighbors().lattice();
    assert_eq!(lattice.cell_coords(lattice.cell_of(i).unwrap()), [2, 1, 1]);
    assert_cells_match(&sim);
    sim.energy().unwrap();
    assert_eq!(sim.neighbors().rebuild_count(), 1);

    // across the periodic edge
    sim.set_position(i, [10.05, 5.0, 5.0]).unwrap();
    let lattice = sim.neighbors().lattice();
    assert_eq!(lattice.cell_coords(lattice.cell_of(i).unwrap()), [0, 1, 1]);
    assert_cells_match(&sim);

    let j = sim.add_particle(0, [1.0; 3]).unwrap();
    assert!(sim.neighbors().lattice().cell_of(j).is_some());
    assert_cells_match(&sim);

    sim.remove_particle(j).unwrap();
    assert_eq!(sim.neighbors().lattice().cell_of(j), None);
    assert_cells_match(&sim);
}

#[test]
fn displacement_past_half_skin_rebuilds_without_misses() {
    init_logger();
    let container = Container::periodic([9.0; 3]).unwrap();
    let mut sim = Simulation::new(container, Settings::new(2.0, 0.4)).unwrap();
    random_particles(&mut sim, 200, 21);
    sim.potentials_mut().unwrap().add_pair(0, 0, lj(2.0)).unwrap();
    sim.energy().unwrap();
    assert_eq!(sim.neighbors().rebuild_count(), 1);

    // many small moves stay within the skin
    let mut rng = StdRng::seed_from_u64(22);
    for i in (0..200).filter(|&i| i != 42) {
        let dr = [
            rng.gen_range(-0.1..0.1),
            rng.gen_range(-0.1..0.1),
            rng.gen_range(-0.1..0.1),
        ];
        sim.displace(i, dr).unwrap();
    }
    sim.energy().unwrap();
    assert_eq!(sim.neighbors().rebuild_count(), 1);

    sim.displace(42, [0.2 + 1e-6, 0.0, 0.0]).unwrap();
    assert!(sim.neighbors().is_stale());
    sim.energy().unwrap();
    assert_eq!(sim.neighbors().rebuild_count(), 2);
    assert!(missing_partners(&sim).is_empty());
}

#[test]
fn partners_are_found_across_the_periodic_edge() {
    let container = Container::periodic([10.0; 3]).unwrap();
    let mut sim = Simulation::new(container, Settings::new(1.0, 0.2)).unwrap();
    let a = sim.add_particle(0, [0.1, 5.0, 5.0]).unwrap();
    let b = sim.add_particle(0, [9.9, 5.0, 5.0]).unwrap();
    let c = sim.add_particle(0, [5.0, 9.95, 0.05]).unwrap();
    let d = sim.add_particle(0, [5.0, 0.05, 9.95]).unwrap();
    sim.potentials_mut()
        .unwrap()
        .add_pair(0, 0, HardSphere::new(0.5))
        .unwrap();

    assert_eq!(sim.particle_energy(a).unwrap(), f64::INFINITY);
    assert_eq!(sim.neighbors().neighbors(a), &[b]);
    assert_eq!(sim.neighbors().neighbors(c), &[d]);
    assert!(missing_partners(&sim).is_empty());
}

#[test]
fn fixed_boundaries_do_not_wrap() {
    let rect = Rect::from_lengths([10.0; 3]);
    let container = Container::new(rect, [BC::FF, BC::PP, BC::PP]).unwrap();
    let mut sim = Simulation::new(container, Settings::new(1.0, 0.2)).unwrap();
    let a = sim.add_particle(0, [0.1, 5.0, 5.0]).unwrap();
    sim.add_particle(0, [9.9, 5.0, 5.0]).unwrap();
    sim.potentials_mut()
        .unwrap()
        .add_pair(0, 0, HardSphere::new(0.5))
        .unwrap();
    assert_eq!(sim.particle_energy(a).unwrap(), 0.0);
    assert!(sim.neighbors().neighbors(a).is_empty());
}

#[test]
fn insertion_and_removal_invalidate_lists() {
    let container = Container::periodic([10.0; 3]).unwrap();
    let mut sim = Simulation::new(container, Settings::new(1.0, 0.2)).unwrap();
    sim.potentials_mut()
        .unwrap()
        .add_pair(0, 0, HardSphere::new(1.0))
        .unwrap();
    let a = sim.add_particle(0, [5.0; 3]).unwrap();
    assert_eq!(sim.energy().unwrap(), 0.0);

    let b = sim.add_particle(0, [5.5, 5.0, 5.0]).unwrap();
    assert_eq!(sim.energy().unwrap(), f64::INFINITY);

    sim.remove_particle(b).unwrap();
    assert_eq!(sim.energy().unwrap(), 0.0);
    assert!(sim.neighbors().neighbors(a).is_empty());

    // the freed index is handed out again
    assert_eq!(sim.add_particle(0, [1.0; 3]).unwrap(), b);
}

#[test]
fn shrinking_the_box_needs_a_new_lattice() {
    init_logger();
    let container = Container::periodic([12.0; 3]).unwrap();
    let settings = Settings::new(2.5, 0.3).with_cell_size(1.4);
    let mut sim = Simulation::new(container, settings).unwrap();
    jittered_grid(&mut sim, 5, 0.1, 23);
    sim.potentials_mut().unwrap().add_pair(0, 0, lj(2.5)).unwrap();
    sim.configure(4).unwrap();
    sim.energy().unwrap();

    sim.set_lengths([10.0, 12.0, 12.0]).unwrap();
    assert!(matches!(sim.energy(), Err(Error::CellTooSmall { .. })));

    // moves are refused while the lattice does not fit
    assert!(matches!(
        sim.displace(0, [0.01, 0.0, 0.0]),
        Err(Error::CellTooSmall { .. })
    ));

    sim.recreate_lattice().unwrap();
    assert_eq!(sim.neighbors().lattice().num_cells(), [7, 8, 8]);
    assert_cells_match(&sim);
    // the partition follows the new lattice
    assert_eq!(sim.executor().partition().unwrap().axis(), Axis::Y);
    let threaded = sim.energy().unwrap();
    assert!(missing_partners(&sim).is_empty());

    sim.configure(1).unwrap();
    assert!(relative_difference(threaded, sim.energy().unwrap()) < 1e-10);
}

#[test]
fn oversized_potentials_are_rejected() {
    let container = Container::periodic([10.0; 3]).unwrap();
    let mut sim = Simulation::new(container, Settings::new(2.0, 0.3)).unwrap();
    sim.add_particle(0, [1.0; 3]).unwrap();
    sim.potentials_mut().unwrap().add_pair(0, 0, lj(2.5)).unwrap();
    assert_eq!(
        sim.energy(),
        Err(Error::RangeExceeded {
            potential_range: 2.5,
            neighbor_range: 2.0
        })
    );
}
