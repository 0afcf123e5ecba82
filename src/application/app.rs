use crate::application::simulator::ChangeSimulator;
use crate::config::{Settings, SimulationConfig};
use crate::infrastructure::log_messages::application as msg;
use crate::infrastructure::FileSystemSink;
use crate::Result;
use tracing::{error, info, instrument};

/// Main application struct that wires settings to the simulator
pub struct Application {
    settings: Settings,
    simulator: ChangeSimulator<FileSystemSink>,
}

impl Application {
    /// Resolution happens here, so a missing variable fails before any write
    pub fn from_settings<F>(settings: Settings, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = SimulationConfig::from_settings(&settings.simulation, lookup)?;
        info!(
            container = %config.container_dir().display(),
            writes = config.total_writes(),
            "{}",
            msg::SETTINGS_LOADED
        );

        Ok(Self {
            settings,
            simulator: ChangeSimulator::new(config, FileSystemSink::new()),
        })
    }

    #[instrument(skip(self))]
    pub async fn run(mut self) -> Result<()> {
        info!("{}", msg::STARTING);

        if let Err(e) = self.simulator.run().await {
            error!(error = %e, state = %self.simulator.state(), "{}", msg::FAILED);
            return Err(e);
        }

        info!(writes = self.simulator.writes_applied(), "{}", msg::FINISHED);
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn simulator(&self) -> &ChangeSimulator<FileSystemSink> {
        &self.simulator
    }
}
