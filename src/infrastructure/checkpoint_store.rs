//! In-process partition source and checkpoint store
//!
//! Stands in for a hosted event hub when exercising the checkpointing
//! handler. Partitions are replayed in id order, events in sequence order.
//! A stored checkpoint takes precedence over the starting position.

use crate::application::consumer::{CheckpointingHandler, EventSource, PartitionContext};
use crate::domain::partition::{
    Checkpoint, CheckpointError, PartitionId, ReceivedEvent, StartingPosition,
};
use crate::error::Result;
use crate::infrastructure::log_messages::consumer as msg;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[derive(Debug, Default)]
pub struct InMemoryCheckpointStore {
    checkpoints: Mutex<HashMap<PartitionId, Checkpoint>>,
}

impl InMemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn checkpoint(&self, partition_id: &PartitionId) -> Option<Checkpoint> {
        self.checkpoints.lock().get(partition_id).cloned()
    }

    /// All checkpoints ordered by partition id
    pub fn checkpoints(&self) -> Vec<Checkpoint> {
        let mut all: Vec<Checkpoint> = self.checkpoints.lock().values().cloned().collect();
        all.sort_by(|a, b| a.partition_id.cmp(&b.partition_id));
        all
    }

    /// Record the event as processed; checkpoints never move backwards
    pub fn store(&self, event: &ReceivedEvent) -> std::result::Result<Checkpoint, CheckpointError> {
        let mut checkpoints = self.checkpoints.lock();
        if let Some(current) = checkpoints.get(&event.partition_id) {
            if event.sequence_number < current.sequence_number {
                return Err(CheckpointError::Regression {
                    partition_id: event.partition_id.clone(),
                    current: current.sequence_number,
                    requested: event.sequence_number,
                });
            }
        }
        let checkpoint = Checkpoint::for_event(event);
        checkpoints.insert(event.partition_id.clone(), checkpoint.clone());
        Ok(checkpoint)
    }
}

pub struct InMemoryPartition {
    partition_id: PartitionId,
    store: Arc<InMemoryCheckpointStore>,
}

impl InMemoryPartition {
    pub fn new(partition_id: PartitionId, store: Arc<InMemoryCheckpointStore>) -> Self {
        Self {
            partition_id,
            store,
        }
    }
}

#[async_trait]
impl PartitionContext for InMemoryPartition {
    fn partition_id(&self) -> &PartitionId {
        &self.partition_id
    }

    async fn update_checkpoint(
        &self,
        event: &ReceivedEvent,
    ) -> std::result::Result<Checkpoint, CheckpointError> {
        if event.partition_id != self.partition_id {
            return Err(CheckpointError::PartitionMismatch {
                context_partition: self.partition_id.clone(),
                event_partition: event.partition_id.clone(),
            });
        }
        self.store.store(event)
    }
}

/// Finite replay of queued events
pub struct InMemoryEventSource {
    store: Arc<InMemoryCheckpointStore>,
    partitions: BTreeMap<PartitionId, Vec<ReceivedEvent>>,
}

impl InMemoryEventSource {
    pub fn new(store: Arc<InMemoryCheckpointStore>) -> Self {
        Self {
            store,
            partitions: BTreeMap::new(),
        }
    }

    pub fn with_event(mut self, event: ReceivedEvent) -> Self {
        let events = self.partitions.entry(event.partition_id.clone()).or_default();
        events.push(event);
        events.sort_by_key(|e| e.sequence_number);
        self
    }

    pub fn store(&self) -> &Arc<InMemoryCheckpointStore> {
        &self.store
    }
}

#[async_trait]
impl EventSource for InMemoryEventSource {
    #[instrument(skip(self, handler), fields(partitions = self.partitions.len()))]
    async fn receive(
        &self,
        handler: &CheckpointingHandler,
        starting_position: StartingPosition,
    ) -> Result<usize> {
        let mut handled = 0;

        for (partition_id, events) in &self.partitions {
            let context = InMemoryPartition::new(partition_id.clone(), Arc::clone(&self.store));
            let resume_after = self.store.checkpoint(partition_id).map(|c| c.sequence_number);
            if let Some(sequence_number) = resume_after {
                debug!(
                    partition_id = %partition_id,
                    after = %sequence_number,
                    "{}",
                    msg::RESUMING_FROM_CHECKPOINT
                );
            }

            let pending = events.iter().filter(|event| match resume_after {
                Some(sequence_number) => event.sequence_number > sequence_number,
                None => starting_position.admits(event),
            });

            for event in pending {
                handler.on_event(&context, event).await?;
                handled += 1;
            }
        }

        info!(handled, "{}", msg::RECEIVE_FINISHED);
        Ok(handled)
    }
}
