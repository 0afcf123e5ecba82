//! Log message constants for the change simulator
//!
//! This module centralizes the log messages used throughout the crate so
//! the wording stays consistent between the binary, the simulator and the
//! consumer callback.

/// Application startup and lifecycle messages
pub mod application {
    pub const STARTING: &str = "Starting change simulator";
    pub const SETTINGS_LOADED: &str = "Settings loaded";
    pub const FINISHED: &str = "Change simulator finished";
    pub const FAILED: &str = "Change simulator failed";
}

/// Simulator run messages
pub mod simulator {
    pub const RUN_STARTED: &str = "Simulation run started";
    pub const STATE_TRANSITION: &str = "Simulator state transition";
    pub const CONTAINER_PREPARED: &str = "Container directory prepared";
    pub const WARMING_UP: &str = "Waiting for watcher to attach";
    pub const WRITE_APPLIED: &str = "Overwrote key file";
    pub const KEY_FILE_FLUSHED: &str = "Key file flushed";
    pub const WRITE_FAILED: &str = "Key file write failed; aborting remaining writes";
    pub const RUN_COMPLETED: &str = "Simulation run completed";
}

/// Event-hub consumer messages
pub mod consumer {
    pub const RECEIVED_EVENT: &str = "Received event from partition";
    pub const CHECKPOINT_UPDATED: &str = "Checkpoint updated";
    pub const CHECKPOINT_FAILED: &str = "Checkpoint update failed";
    pub const RESUMING_FROM_CHECKPOINT: &str = "Resuming partition after stored checkpoint";
    pub const RECEIVE_FINISHED: &str = "Receive loop finished";
}
