//! Change Simulator - deterministic filesystem stimulus for file-watch interfaces
//!
//! Waits for a watcher to attach, then overwrites a fixed set of key files
//! in a known order so that a key-value store's watch interface can be
//! checked for correct detection and ordering of change events. Also
//! carries the checkpointing callback used by event-hub consumer demos.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::{Application, ChangeSimulator, ChangeSink, CheckpointingHandler};
pub use crate::config::{Settings, SimulationConfig};
pub use error::{Error, Result};
pub use infrastructure::FileSystemSink;
