//! Value types for the event-hub consumer callback
//!
//! The vendor SDK is not part of this crate; these types describe the
//! data that crosses the callback boundary.

use chrono::{DateTime, Utc};
use derive_more::Display;
use nutype::nutype;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Identifier of an event-hub partition
#[nutype(
    validate(not_empty, len_char_max = 128),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct PartitionId(String);

/// Monotonic position of an event within its partition
#[nutype(
    validate(predicate = |n| *n >= 0),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct SequenceNumber(i64);

/// Byte offset of an event within its partition
#[nutype(
    validate(predicate = |n| *n >= 0),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct EventOffset(i64);

/// An event delivered to the consumer callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedEvent {
    pub partition_id: PartitionId,
    pub sequence_number: SequenceNumber,
    pub offset: EventOffset,
    pub body: Vec<u8>,
    pub enqueued_at: DateTime<Utc>,
}

/// Durable marker of the last processed event in a partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub partition_id: PartitionId,
    pub sequence_number: SequenceNumber,
    pub offset: EventOffset,
    pub updated_at: DateTime<Utc>,
}

impl Checkpoint {
    pub fn for_event(event: &ReceivedEvent) -> Self {
        Self {
            partition_id: event.partition_id.clone(),
            sequence_number: event.sequence_number,
            offset: event.offset,
            updated_at: Utc::now(),
        }
    }
}

/// Where a receiver starts reading when no checkpoint exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum StartingPosition {
    /// From the beginning of the partition
    #[default]
    #[display("-1")]
    Earliest,
    /// Only events enqueued after receiving starts
    #[display("@latest")]
    Latest,
    /// Events strictly after the given offset
    #[display("{_0}")]
    Offset(EventOffset),
}

impl StartingPosition {
    /// Whether an event lies at or after this starting position
    pub fn admits(&self, event: &ReceivedEvent) -> bool {
        match self {
            Self::Earliest => true,
            Self::Latest => false,
            Self::Offset(offset) => event.offset > *offset,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid starting position '{0}': expected -1, @latest, or a non-negative offset")]
pub struct InvalidStartingPosition(pub String);

impl FromStr for StartingPosition {
    type Err = InvalidStartingPosition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-1" => Ok(Self::Earliest),
            "@latest" => Ok(Self::Latest),
            other => other
                .parse::<i64>()
                .ok()
                .and_then(|n| EventOffset::try_new(n).ok())
                .map(Self::Offset)
                .ok_or_else(|| InvalidStartingPosition(s.to_string())),
        }
    }
}

/// Failures surfaced through the checkpoint callback contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckpointError {
    #[error("checkpoint store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("event from partition {event_partition} cannot be checkpointed on partition {context_partition}")]
    PartitionMismatch {
        context_partition: PartitionId,
        event_partition: PartitionId,
    },

    #[error("checkpoint for partition {partition_id} cannot move back from {current} to {requested}")]
    Regression {
        partition_id: PartitionId,
        current: SequenceNumber,
        requested: SequenceNumber,
    },
}
