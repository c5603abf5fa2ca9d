//! Reference port implementations.
//!
//! [`MemoryStore`] implements every port behind one mutex and supports
//! one-shot failure injection for rollback tests. [`FilePityStore`] keeps
//! pity counters in a JSON file so they survive restarts.

pub mod memory;
pub mod pity_file;

pub use memory::{FailPoint, MemoryStore};
pub use pity_file::FilePityStore;
