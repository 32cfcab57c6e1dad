//! Event store implementations.

mod json;
mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use vigil_core::EventStore;
