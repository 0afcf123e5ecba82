//! Infrastructure adapters
//!
//! Concrete implementations of the application ports plus shared log
//! message text.

pub mod checkpoint_store;
pub mod filesystem;
pub mod log_messages;

pub use checkpoint_store::{InMemoryCheckpointStore, InMemoryEventSource, InMemoryPartition};
pub use filesystem::FileSystemSink;
