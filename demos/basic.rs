use jcell::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Simple cubic lattice points at the given number density
fn cubic_coords(density: f64, per_side: usize) -> (f64, Vec<[f64; 3]>) {
    let spacing = density.powf(-1.0 / 3.0);
    let mut coords = Vec::with_capacity(per_side * per_side * per_side);
    for i in 0..per_side {
        for j in 0..per_side {
            for k in 0..per_side {
                coords.push([
                    (i as f64 + 0.5) * spacing,
                    (j as f64 + 0.5) * spacing,
                    (k as f64 + 0.5) * spacing,
                ]);
            }
        }
    }
    (spacing * per_side as f64, coords)
}

fn main() -> Result<()> {
    env_logger::init();
    let (length, coords) = cubic_coords(0.8, 10);
    let container = Container::periodic([length; 3])?;
    let settings = Settings::new(2.5, 0.3).with_cell_size(1.25);
    let mut simulation = Simulation::new(container, settings)?;

    for c in &coords {
        simulation.add_particle(0, *c)?;
    }
    let mut lj = LJCut::new(1, 2.5);
    lj.set_coeff(0, 0, 1.0, 1.0, 2.5)?;
    simulation.potentials_mut()?.add_pair(0, 0, lj)?;

    simulation.configure(4)?;
    println!("Start");

    let mut rng = StdRng::seed_from_u64(1);
    let n = coords.len();
    let max_step = 0.1;
    let mut energy = simulation.energy()?;
    let mut accepted = 0;
    for step in 0..=2000 {
        // Metropolis trial move at temperature 1
        let i = rng.gen_range(0..n);
        let old = *simulation.particles().position(i);
        let before = simulation.particle_energy(i)?;
        let dr = [
            rng.gen_range(-max_step..max_step),
            rng.gen_range(-max_step..max_step),
            rng.gen_range(-max_step..max_step),
        ];
        simulation.displace(i, dr)?;
        let after = simulation.particle_energy(i)?;
        let delta = after - before;
        if delta <= 0.0 || rng.gen::<f64>() < (-delta).exp() {
            energy += delta;
            accepted += 1;
        } else {
            simulation.set_position(i, old)?;
        }

        if step % 500 == 0 {
            let mut virial = VirialSum::new();
            simulation.calculate(&Directive::all(), &mut virial)?;
            let volume = simulation.container().rect().volume();
            let pressure = (n as f64 + virial.trace() / 3.0) / volume;
            println!(
                "{:>6} {:>14.6} {:>14.6} {:>10.6} {:>4}",
                step,
                energy / n as f64,
                simulation.energy()? / n as f64,
                pressure,
                simulation.neighbors().rebuild_count()
            );
        }
    }
    println!("Accepted {} moves", accepted);
    Ok(())
}
