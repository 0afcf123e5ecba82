//! Application services and orchestration
//!
//! The change simulator that drives key overwrites, the application shell
//! that wires settings to it, and the checkpointing callback used by
//! event-hub consumers.

pub mod app;
pub mod consumer;
pub mod simulator;

pub use app::Application;
pub use consumer::{CheckpointingHandler, EventSource, PartitionContext};
pub use simulator::{ChangeSimulator, ChangeSink};
