//! Simulator lifecycle
//!
//! The simulator walks a strictly linear sequence with no branching:
//! `Idle → WarmupWait → Writing(0) → InterWriteWait → Writing(1) → ... → InterWriteWait → Done`.
//! Every write, including the last, is followed by an inter-write pause.
//! A run that errors out lands in `Failed`, which like `Done` has no successor.

use crate::error::{Error, Result};
use derive_more::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SimulatorState {
    #[display("idle")]
    Idle,
    #[display("warmup-wait")]
    WarmupWait,
    #[display("writing(step={step})")]
    Writing { step: usize },
    #[display("inter-write-wait(completed={completed})")]
    InterWriteWait { completed: usize },
    #[display("done")]
    Done,
    #[display("failed(completed={completed})")]
    Failed { completed: usize },
}

impl SimulatorState {
    /// The state that follows this one for a plan of `total_steps` writes
    pub fn advance(self, total_steps: usize) -> Result<Self> {
        match self {
            Self::Idle => Ok(Self::WarmupWait),
            Self::WarmupWait if total_steps == 0 => Ok(Self::Done),
            Self::WarmupWait => Ok(Self::Writing { step: 0 }),
            Self::Writing { step } if step < total_steps => {
                Ok(Self::InterWriteWait { completed: step + 1 })
            }
            Self::InterWriteWait { completed } if completed < total_steps => {
                Ok(Self::Writing { step: completed })
            }
            Self::InterWriteWait { completed } if completed == total_steps => Ok(Self::Done),
            other => Err(Error::invalid_transition(format!(
                "no transition from {other} for a plan of {total_steps} writes"
            ))),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed { .. })
    }
}
