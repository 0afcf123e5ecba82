//! The ordered sequence of writes a simulation performs
//!
//! Writes are ordered suffix-major: every iteration for the first suffix
//! completes before the next suffix is touched.

use super::config_types::{ContentPrefix, KeyStem, KeySuffix, WriteIterations};
use super::target::{TargetPath, WriteEvent, WriteIndex};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationPlan {
    events: Vec<WriteEvent>,
}

impl SimulationPlan {
    /// One target per suffix under `directory`, each written `iterations` times
    pub fn new(
        directory: &Path,
        key_stem: &KeyStem,
        suffixes: &[KeySuffix],
        iterations: WriteIterations,
        content_prefix: &ContentPrefix,
    ) -> Self {
        let events = suffixes
            .iter()
            .flat_map(|suffix| {
                let target = TargetPath::new(directory, key_stem.clone(), suffix.clone());
                (0..iterations.into_inner()).map(move |i| {
                    WriteEvent::new(target.clone(), WriteIndex::new(i), content_prefix)
                })
            })
            .collect();

        Self { events }
    }

    pub fn get(&self, step: usize) -> Option<&WriteEvent> {
        self.events.get(step)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[WriteEvent] {
        &self.events
    }

    /// Distinct targets in the order they are first written
    pub fn targets(&self) -> Vec<&TargetPath> {
        let mut targets: Vec<&TargetPath> = Vec::new();
        for event in &self.events {
            if !targets.contains(&&event.target) {
                targets.push(&event.target);
            }
        }
        targets
    }
}
