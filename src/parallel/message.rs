/// Unit of work handed to a worker
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Manager-to-Worker messages
pub enum M2W {
    Run(Job),
    Stop,
}

/// Worker-to-Manager messages
#[derive(Debug, PartialEq)]
pub enum W2M {
    Complete(usize),
    Failed(usize, String),
}
