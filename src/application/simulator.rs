use crate::config::SimulationConfig;
use crate::domain::{Content, SimulationPlan, SimulatorState, TargetPath};
use crate::error::Result;
use crate::infrastructure::log_messages::simulator as msg;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument};

/// Destination for simulated key writes
#[async_trait]
pub trait ChangeSink: Send + Sync {
    /// Called once before the warm-up when the container should be created
    async fn prepare_directory(&self, _directory: &Path) -> Result<()> {
        Ok(())
    }

    /// Replace the full content of the target
    async fn overwrite(&self, target: &TargetPath, content: &Content) -> Result<()>;
}

#[async_trait]
impl<T: ChangeSink + ?Sized> ChangeSink for Arc<T> {
    async fn prepare_directory(&self, directory: &Path) -> Result<()> {
        (**self).prepare_directory(directory).await
    }

    async fn overwrite(&self, target: &TargetPath, content: &Content) -> Result<()> {
        (**self).overwrite(target, content).await
    }
}

/// Emits a deterministic sequence of key overwrites for a file watcher to observe
///
/// A run waits out the warm-up delay, then applies each planned write in
/// order with a pause after every write. The first failure aborts the run
/// and leaves the simulator in `Failed`; a simulator runs at most once.
pub struct ChangeSimulator<S> {
    config: SimulationConfig,
    plan: SimulationPlan,
    sink: S,
    state: SimulatorState,
    writes_applied: usize,
}

impl<S: ChangeSink> ChangeSimulator<S> {
    pub fn new(config: SimulationConfig, sink: S) -> Self {
        let plan = config.plan();
        Self {
            config,
            plan,
            sink,
            state: SimulatorState::Idle,
            writes_applied: 0,
        }
    }

    #[instrument(skip(self), fields(container = %self.config.container_dir().display()))]
    pub async fn run(&mut self) -> Result<()> {
        if self.state != SimulatorState::Idle {
            return Err(crate::Error::invalid_transition(format!(
                "simulator already ran and is in state {}",
                self.state
            )));
        }

        info!(
            planned_writes = self.plan.len(),
            targets = self.plan.targets().len(),
            "{}",
            msg::RUN_STARTED
        );

        while !self.state.is_terminal() {
            let next = self.state.advance(self.plan.len())?;
            debug!(from = %self.state, to = %next, "{}", msg::STATE_TRANSITION);
            self.state = next;

            if let Err(e) = self.enter(next).await {
                self.state = SimulatorState::Failed {
                    completed: self.writes_applied,
                };
                return Err(e);
            }
        }

        info!(writes = self.writes_applied, "{}", msg::RUN_COMPLETED);
        Ok(())
    }

    async fn enter(&mut self, state: SimulatorState) -> Result<()> {
        match state {
            SimulatorState::WarmupWait => {
                if self.config.create_container {
                    let directory = self.config.container_dir();
                    self.sink.prepare_directory(&directory).await?;
                    debug!(directory = %directory.display(), "{}", msg::CONTAINER_PREPARED);
                }
                debug!(delay_ms = self.config.warmup.into_inner(), "{}", msg::WARMING_UP);
                sleep(self.config.warmup.as_duration()).await;
                Ok(())
            }
            SimulatorState::Writing { step } => self.apply(step).await,
            SimulatorState::InterWriteWait { .. } => {
                sleep(self.config.inter_write.as_duration()).await;
                Ok(())
            }
            SimulatorState::Done => Ok(()),
            SimulatorState::Idle | SimulatorState::Failed { .. } => Err(
                crate::Error::invalid_transition(format!("cannot enter {state} mid-run")),
            ),
        }
    }

    async fn apply(&mut self, step: usize) -> Result<()> {
        let event = self.plan.get(step).ok_or_else(|| {
            crate::Error::invalid_transition(format!("step {step} is outside the write plan"))
        })?;
        let path = event.target.file_path();

        if let Err(e) = self.sink.overwrite(&event.target, &event.content).await {
            error!(path = %path.display(), step, error = %e, "{}", msg::WRITE_FAILED);
            return Err(e);
        }

        self.writes_applied += 1;
        info!(
            path = %path.display(),
            content = %event.content,
            step,
            "{}",
            msg::WRITE_APPLIED
        );
        Ok(())
    }

    pub fn state(&self) -> SimulatorState {
        self.state
    }

    pub fn writes_applied(&self) -> usize {
        self.writes_applied
    }

    pub fn plan(&self) -> &SimulationPlan {
        &self.plan
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::error::{Error, FileOperation};
    use parking_lot::Mutex;
    use std::io;
    use std::path::PathBuf;
    use std::time::Duration;
    use tokio::time::Instant;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct RecordedWrite {
        path: PathBuf,
        content: String,
        at: Instant,
    }

    /// Records writes and optionally fails from a given write onwards
    #[derive(Default)]
    struct RecordingSink {
        writes: Mutex<Vec<RecordedWrite>>,
        prepared: Mutex<Vec<PathBuf>>,
        fail_from: Option<usize>,
    }

    impl RecordingSink {
        fn failing_from(write: usize) -> Self {
            Self {
                fail_from: Some(write),
                ..Self::default()
            }
        }

        fn writes(&self) -> Vec<RecordedWrite> {
            self.writes.lock().clone()
        }
    }

    #[async_trait]
    impl ChangeSink for RecordingSink {
        async fn prepare_directory(&self, directory: &Path) -> Result<()> {
            self.prepared.lock().push(directory.to_path_buf());
            Ok(())
        }

        async fn overwrite(&self, target: &TargetPath, content: &Content) -> Result<()> {
            let mut writes = self.writes.lock();
            if self.fail_from.is_some_and(|n| writes.len() >= n) {
                return Err(Error::file_system(
                    &target.file_path(),
                    FileOperation::Open,
                    io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
                ));
            }
            writes.push(RecordedWrite {
                path: target.file_path(),
                content: content.to_string(),
                at: Instant::now(),
            });
            Ok(())
        }
    }

    fn default_config() -> SimulationConfig {
        let settings = Settings::with_overrides(Vec::<(&str, String)>::new()).unwrap();
        SimulationConfig::from_settings(&settings.simulation, |_| None).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn run_applies_four_writes_in_order() {
        let sink = Arc::new(RecordingSink::default());
        let mut simulator = ChangeSimulator::new(default_config(), Arc::clone(&sink));

        simulator.run().await.unwrap();

        let writes = sink.writes();
        let observed: Vec<(String, &str)> = writes
            .iter()
            .map(|w| (w.path.display().to_string(), w.content.as_str()))
            .collect();
        assert_eq!(
            observed,
            vec![
                ("/tmp/my-container/my-key".to_string(), "content_0"),
                ("/tmp/my-container/my-key".to_string(), "content_1"),
                ("/tmp/my-container/my-key2".to_string(), "content_0"),
                ("/tmp/my-container/my-key2".to_string(), "content_1"),
            ]
        );
        assert_eq!(simulator.writes_applied(), 4);
        assert_eq!(simulator.state(), SimulatorState::Done);
    }

    fn assert_about(actual: Duration, expected_ms: u64) {
        let expected = Duration::from_millis(expected_ms);
        assert!(
            actual >= expected && actual < expected + Duration::from_millis(5),
            "expected about {expected:?}, got {actual:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn run_waits_for_warmup_and_spaces_writes() {
        let sink = Arc::new(RecordingSink::default());
        let mut simulator = ChangeSimulator::new(default_config(), Arc::clone(&sink));

        let started = Instant::now();
        simulator.run().await.unwrap();
        let finished = Instant::now();

        let writes = sink.writes();
        assert_about(writes[0].at - started, 1000);
        for pair in writes.windows(2) {
            assert_about(pair[1].at - pair[0].at, 100);
        }
        // pause after the final write too
        assert_about(finished - writes[3].at, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_aborts_remaining_writes() {
        let sink = Arc::new(RecordingSink::failing_from(0));
        let mut simulator = ChangeSimulator::new(default_config(), Arc::clone(&sink));

        let error = simulator.run().await.unwrap_err();

        assert!(matches!(error, Error::FileSystem { .. }));
        assert!(sink.writes().is_empty());
        assert_eq!(simulator.writes_applied(), 0);
        assert_eq!(simulator.state(), SimulatorState::Failed { completed: 0 });
    }

    #[tokio::test(start_paused = true)]
    async fn failure_midway_keeps_completed_writes_only() {
        let sink = Arc::new(RecordingSink::failing_from(2));
        let mut simulator = ChangeSimulator::new(default_config(), Arc::clone(&sink));

        assert!(simulator.run().await.is_err());

        assert_eq!(sink.writes().len(), 2);
        assert_eq!(simulator.state(), SimulatorState::Failed { completed: 2 });
    }

    #[tokio::test(start_paused = true)]
    async fn container_is_prepared_only_when_requested() {
        let sink = Arc::new(RecordingSink::default());
        let mut simulator = ChangeSimulator::new(default_config(), Arc::clone(&sink));
        simulator.run().await.unwrap();
        assert!(sink.prepared.lock().is_empty());

        let mut config = default_config();
        config.create_container = true;
        let sink = Arc::new(RecordingSink::default());
        let mut simulator = ChangeSimulator::new(config, Arc::clone(&sink));
        simulator.run().await.unwrap();
        assert_eq!(
            sink.prepared.lock().as_slice(),
            &[PathBuf::from("/tmp/my-container")]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn completed_simulator_cannot_run_again() {
        let mut simulator = ChangeSimulator::new(default_config(), RecordingSink::default());
        simulator.run().await.unwrap();

        let error = simulator.run().await.unwrap_err();
        assert!(matches!(error, Error::InvalidStateTransition(_)));
    }

    /// Fails the first write only, so a retried run would otherwise succeed
    #[derive(Default)]
    struct FlakySink {
        inner: RecordingSink,
        failed_once: Mutex<bool>,
    }

    #[async_trait]
    impl ChangeSink for FlakySink {
        async fn overwrite(&self, target: &TargetPath, content: &Content) -> Result<()> {
            let already_failed = std::mem::replace(&mut *self.failed_once.lock(), true);
            if !already_failed {
                return Err(Error::file_system(
                    &target.file_path(),
                    FileOperation::Open,
                    io::Error::new(io::ErrorKind::NotFound, "missing container"),
                ));
            }
            self.inner.overwrite(target, content).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failed_simulator_cannot_run_again() {
        let sink = Arc::new(FlakySink::default());
        let mut simulator = ChangeSimulator::new(default_config(), Arc::clone(&sink));
        assert!(simulator.run().await.is_err());

        let error = simulator.run().await.unwrap_err();

        assert!(matches!(error, Error::InvalidStateTransition(_)));
        assert!(sink.inner.writes().is_empty());
        assert_eq!(simulator.writes_applied(), 0);
        assert_eq!(simulator.state(), SimulatorState::Failed { completed: 0 });
    }
}
