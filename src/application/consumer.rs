//! Checkpointing consumer callback for event-hub partitions
//!
//! The handler logs the partition an event arrived on and checkpoints it
//! straight away. Retry and backoff belong to whatever drives the
//! callback; a failed checkpoint is handed back unchanged.

use crate::domain::partition::{
    Checkpoint, CheckpointError, PartitionId, ReceivedEvent, StartingPosition,
};
use crate::error::Result;
use crate::infrastructure::log_messages::consumer as msg;
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Per-partition view handed to the callback by the receiving client
#[async_trait]
pub trait PartitionContext: Send + Sync {
    fn partition_id(&self) -> &PartitionId;

    /// Mark the event as durably processed
    async fn update_checkpoint(
        &self,
        event: &ReceivedEvent,
    ) -> std::result::Result<Checkpoint, CheckpointError>;
}

/// Source of partitioned events that drives a handler
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Deliver events to the handler; returns how many were handled
    async fn receive(
        &self,
        handler: &CheckpointingHandler,
        starting_position: StartingPosition,
    ) -> Result<usize>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CheckpointingHandler;

impl CheckpointingHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn on_event(
        &self,
        context: &dyn PartitionContext,
        event: &ReceivedEvent,
    ) -> Result<()> {
        let partition_id = context.partition_id();
        info!(
            partition_id = %partition_id,
            sequence_number = %event.sequence_number,
            "{} {}",
            msg::RECEIVED_EVENT,
            partition_id
        );

        match context.update_checkpoint(event).await {
            Ok(checkpoint) => {
                debug!(
                    partition_id = %checkpoint.partition_id,
                    offset = %checkpoint.offset,
                    "{}",
                    msg::CHECKPOINT_UPDATED
                );
                Ok(())
            }
            Err(e) => {
                warn!(partition_id = %partition_id, error = %e, "{}", msg::CHECKPOINT_FAILED);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::partition::{EventOffset, SequenceNumber};
    use crate::error::Error;
    use chrono::Utc;
    use parking_lot::Mutex;

    struct FakeContext {
        partition_id: PartitionId,
        checkpoints: Mutex<Vec<Checkpoint>>,
        failure: Option<CheckpointError>,
    }

    impl FakeContext {
        fn new(partition: &str) -> Self {
            Self {
                partition_id: PartitionId::try_new(partition.to_string()).unwrap(),
                checkpoints: Mutex::new(Vec::new()),
                failure: None,
            }
        }
    }

    #[async_trait]
    impl PartitionContext for FakeContext {
        fn partition_id(&self) -> &PartitionId {
            &self.partition_id
        }

        async fn update_checkpoint(
            &self,
            event: &ReceivedEvent,
        ) -> std::result::Result<Checkpoint, CheckpointError> {
            if let Some(failure) = &self.failure {
                return Err(failure.clone());
            }
            let checkpoint = Checkpoint::for_event(event);
            self.checkpoints.lock().push(checkpoint.clone());
            Ok(checkpoint)
        }
    }

    fn event(partition: &str, sequence: i64) -> ReceivedEvent {
        ReceivedEvent {
            partition_id: PartitionId::try_new(partition.to_string()).unwrap(),
            sequence_number: SequenceNumber::try_new(sequence).unwrap(),
            offset: EventOffset::try_new(sequence * 100).unwrap(),
            body: b"{}".to_vec(),
            enqueued_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn on_event_checkpoints_immediately() {
        let context = FakeContext::new("3");
        let handler = CheckpointingHandler::new();

        handler.on_event(&context, &event("3", 9)).await.unwrap();

        let checkpoints = context.checkpoints.lock();
        assert_eq!(checkpoints.len(), 1);
        assert_eq!(checkpoints[0].sequence_number.into_inner(), 9);
        assert_eq!(checkpoints[0].offset.into_inner(), 900);
    }

    #[tokio::test]
    async fn checkpoint_failure_is_propagated_unchanged() {
        let mut context = FakeContext::new("0");
        let failure = CheckpointError::StoreUnavailable("blob lease lost".to_string());
        context.failure = Some(failure.clone());

        let error = CheckpointingHandler::new()
            .on_event(&context, &event("0", 1))
            .await
            .unwrap_err();

        assert!(matches!(error, Error::UpstreamCallback(ref e) if *e == failure));
    }
}
