use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::mpsc,
};

use log::trace;

use super::message::{M2W, W2M};

/// Channels for communication between a worker thread and the manager
pub struct Worker {
    index: usize,
    rx: mpsc::Receiver<M2W>,
    tx: mpsc::Sender<W2M>,
}
impl Worker {
    pub fn new(index: usize, rx: mpsc::Receiver<M2W>, tx: mpsc::Sender<W2M>) -> Self {
        Self { index, rx, tx }
    }

    /// Run jobs until told to stop or the manager goes away
    pub fn run_thread(self) {
        while let Ok(M2W::Run(job)) = self.rx.recv() {
            let message = match panic::catch_unwind(AssertUnwindSafe(job)) {
                Ok(()) => W2M::Complete(self.index),
                Err(payload) => W2M::Failed(self.index, panic_message(payload.as_ref())),
            };
            if self.tx.send(message).is_err() {
                break;
            }
        }
        trace!("Worker {} exiting", self.index);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
