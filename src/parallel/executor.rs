use std::{
    sync::{mpsc, Arc},
    thread,
};

use log::{debug, info, log_enabled, trace, warn, Level};

use super::{
    message::{M2W, W2M},
    Partition, Worker,
};
use crate::{
    accumulator::Accumulator,
    dispatch::{Directive, Target},
    error::{Error, Result},
    neighbor::CellLattice,
    simulation::State,
};

struct WorkerHandle {
    tx: mpsc::Sender<M2W>,
    handle: thread::JoinHandle<()>,
}

/// Runs all-particle calculations on a fixed pool of worker threads, one per
/// domain region. Each worker fills a private accumulator for the particles
/// in its region; the results are merged in region order.
///
/// A region owns the particles in its cells, and a pair is evaluated by the
/// region owning the particle it is visited from. Under `Direction::Up` that
/// is the lower-indexed particle, wherever its partner's cell lies.
///
/// Without any configured workers everything runs on the calling thread.
#[derive(Default)]
pub struct Executor {
    rx: Option<mpsc::Receiver<W2M>>,
    workers: Vec<WorkerHandle>,
    partition: Option<Arc<Partition>>,
    poisoned: bool,
}
impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_threads(&self) -> usize {
        self.workers.len()
    }
    pub fn partition(&self) -> Option<&Partition> {
        self.partition.as_deref()
    }
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Split the lattice into `num_threads` regions and start one worker for
    /// each, replacing any previous workers
    pub fn configure(&mut self, num_threads: usize, lattice: &CellLattice) -> Result<()> {
        let partition = Partition::for_lattice(lattice, num_threads)?;
        self.shutdown();

        let (tx, rx) = mpsc::channel();
        for index in 0..num_threads {
            let (to_worker, from_manager) = mpsc::channel();
            let worker = Worker::new(index, from_manager, tx.clone());
            let handle = thread::Builder::new()
                .name(format!("jcell-worker-{}", index))
                .spawn(move || worker.run_thread())
                .map_err(|e| Error::config(format!("Failed to spawn worker thread: {}", e)))?;
            self.workers.push(WorkerHandle {
                tx: to_worker,
                handle,
            });
        }
        info!(
            "Configured {} worker threads over {:?} cells, slabs along {:?}",
            num_threads,
            partition.num_cells(),
            partition.axis()
        );
        self.rx = Some(rx);
        self.partition = Some(Arc::new(partition));
        self.poisoned = false;
        Ok(())
    }
    pub fn set_num_threads(&mut self, num_threads: usize, lattice: &CellLattice) -> Result<()> {
        self.configure(num_threads, lattice)
    }

    /// Evaluate a directive against the shared state. Neighbor lists must be
    /// current. On failure `acc` is left as it was.
    pub fn calculate<A: Accumulator>(
        &mut self,
        state: &Arc<State>,
        directive: &Directive,
        acc: &mut A,
    ) -> Result<()> {
        if self.poisoned {
            return Err(Error::Poisoned);
        }
        trace!("Calculating {:?}", directive);
        if matches!(directive.target(), Target::Single(_)) || self.workers.is_empty() {
            return state.dispatcher().calculate(directive, acc);
        }

        let partition = self.current_partition(state.neighbors().lattice())?;
        if log_enabled!(Level::Debug) {
            let lattice = state.neighbors().lattice();
            let counts: Vec<usize> = partition
                .regions()
                .iter()
                .map(|r| r.num_particles(lattice))
                .collect();
            debug!("Particles per region: {:?}", counts);
        }

        let (result_tx, result_rx) = mpsc::channel::<(usize, A)>();
        let mut disconnected = false;
        for (index, worker) in self.workers.iter().enumerate() {
            let state = Arc::clone(state);
            let partition = Arc::clone(&partition);
            let result_tx = result_tx.clone();
            let directive = *directive;
            let mut local = acc.clone();
            local.reset();

            let job = move || {
                let owned = partition.regions()[index].particles(state.neighbors().lattice());
                state
                    .dispatcher()
                    .calculate_owned(&directive, &owned, &mut local);
                drop(state);
                // the manager only reads results once every worker reported
                let _ = result_tx.send((index, local));
            };
            if worker.tx.send(M2W::Run(Box::new(job))).is_err() {
                disconnected = true;
                break;
            }
        }
        drop(result_tx);
        if disconnected {
            self.poisoned = true;
            return Err(Error::Disconnected);
        }

        if let Err(e) = self.handle_messages() {
            self.poisoned = true;
            return Err(e);
        }

        let mut results: Vec<Option<A>> = (0..self.workers.len()).map(|_| None).collect();
        for (index, local) in result_rx.try_iter() {
            results[index] = Some(local);
        }
        if results.iter().any(Option::is_none) {
            self.poisoned = true;
            return Err(Error::Disconnected);
        }
        for local in results.iter().flatten() {
            acc.combine(local);
        }
        Ok(())
    }

    /// Wait for every worker to report. The failure of the lowest-indexed
    /// worker is returned.
    fn handle_messages(&self) -> Result<()> {
        let rx = self.rx.as_ref().ok_or(Error::Disconnected)?;
        let mut threads_complete = 0;
        let mut failure: Option<(usize, String)> = None;
        while threads_complete < self.workers.len() {
            match rx.recv().map_err(|_| Error::Disconnected)? {
                W2M::Complete(_) => threads_complete += 1,
                W2M::Failed(thread, message) => {
                    warn!("Worker {} failed: {}", thread, message);
                    threads_complete += 1;
                    if failure.as_ref().map_or(true, |(t, _)| thread < *t) {
                        failure = Some((thread, message));
                    }
                }
            }
        }
        match failure {
            Some((thread, message)) => Err(Error::Worker { thread, message }),
            None => Ok(()),
        }
    }

    /// Partition matching the lattice, recomputed if the lattice changed shape
    fn current_partition(&mut self, lattice: &CellLattice) -> Result<Arc<Partition>> {
        if let Some(partition) = &self.partition {
            if partition.fits(lattice) {
                return Ok(Arc::clone(partition));
            }
        }
        let partition = Arc::new(Partition::for_lattice(lattice, self.workers.len())?);
        warn!(
            "Cell lattice changed shape; re-partitioned {} regions over {:?} cells",
            self.workers.len(),
            partition.num_cells()
        );
        self.partition = Some(Arc::clone(&partition));
        Ok(partition)
    }

    fn shutdown(&mut self) {
        for worker in &self.workers {
            let _ = worker.tx.send(M2W::Stop);
        }
        for worker in self.workers.drain(..) {
            if worker.handle.join().is_err() {
                warn!("Worker thread panicked outside of a job");
            }
        }
        self.rx = None;
        self.partition = None;
    }
}
impl Drop for Executor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
