//! Domain types for the change simulator
//!
//! This module contains the validated value types, the write plan and the
//! simulator lifecycle, plus the value types that cross the event-hub
//! consumer callback.

pub mod config_types;
pub mod partition;
pub mod plan;
pub mod state;
pub mod target;

pub use partition::*;
pub use plan::SimulationPlan;
pub use state::SimulatorState;
pub use target::*;
