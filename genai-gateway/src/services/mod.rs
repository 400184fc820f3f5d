pub mod classifier;
pub mod dispatcher;
pub mod generation;
pub mod metrics;
pub mod normalizer;
pub mod providers;
pub mod storage;
pub mod validation;

pub use generation::{GenerationError, GenerationService};
pub use storage::{LocalStorage, Storage};
