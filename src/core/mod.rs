pub mod collector;
pub mod errors;
pub mod events;
pub mod models;
pub mod queue;
pub mod scheduler;

pub use errors::{CheckerError, ExecError};
pub use events::Event;
pub use models::{Outcome, ProbeStatus, Task};
