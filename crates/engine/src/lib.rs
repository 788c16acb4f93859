pub mod batcher;
pub mod catalog;
pub mod cycle;
pub mod error;
pub mod normalizer;
pub mod scheduler;

pub use cycle::{CycleRunner, CycleSettings, NotificationCycle};
pub use error::CycleError;
pub use scheduler::Scheduler;
