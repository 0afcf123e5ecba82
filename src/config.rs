use crate::domain::config_types::{
    BaseDir, BaseDirSource, ConnectionString, ContainerName, ContentPrefix, DelayMillis, KeyStem,
    KeySuffix, LogFormat, LogLevel, WriteIterations,
};
use crate::domain::partition::StartingPosition;
use crate::domain::SimulationPlan;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub use config::ConfigError;

const ENV_PREFIX: &str = "CHANGE_SIMULATOR";

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("failed to load settings: {0}")]
    Load(#[from] ConfigError),

    #[error("required environment variable {variable} is not set")]
    MissingVariable { variable: String },

    #[error("invalid setting {field}: {reason}")]
    InvalidSetting { field: String, reason: String },
}

impl ConfigurationError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub simulation: SimulationSettings,
    pub logging: LoggingSettings,
    pub event_hub: EventHubSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulationSettings {
    pub base_dir_source: BaseDirSource,
    pub base_dir: BaseDir,
    pub base_dir_variable: String,
    pub container: ContainerName,
    pub key_stem: KeyStem,
    pub suffixes: Vec<KeySuffix>,
    pub iterations: WriteIterations,
    pub content_prefix: ContentPrefix,
    pub warmup_ms: DelayMillis,
    pub inter_write_ms: DelayMillis,
    pub create_container: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: LogLevel,
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EventHubSettings {
    pub connection_string_variable: String,
    pub consumer_group_variable: String,
    pub hub_name_variable: String,
    pub starting_position: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigurationError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let config = Self::defaults()?
            // Add configuration file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("simulation.suffixes"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Builds settings from the defaults plus explicit overrides, ignoring files and environment
    pub fn with_overrides<I, V>(overrides: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (&'static str, V)>,
        V: Into<config::Value>,
    {
        let mut builder = Self::defaults()?;
        for (key, value) in overrides {
            builder = builder.set_override(key, value)?;
        }
        Ok(builder.build()?.try_deserialize()?)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("simulation.base_dir_source", "literal")?
            .set_default("simulation.base_dir", "/tmp")?
            .set_default("simulation.base_dir_variable", "TMPDIR")?
            .set_default("simulation.container", "my-container")?
            .set_default("simulation.key_stem", "my-key")?
            .set_default("simulation.suffixes", vec!["", "2"])?
            .set_default("simulation.iterations", 2)?
            .set_default("simulation.content_prefix", "content_")?
            .set_default("simulation.warmup_ms", 1000)?
            .set_default("simulation.inter_write_ms", 100)?
            .set_default("simulation.create_container", false)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "full")?
            .set_default(
                "event_hub.connection_string_variable",
                "AZURE_EVENT_HUB_CONNECTION_STRING",
            )?
            .set_default(
                "event_hub.consumer_group_variable",
                "AZURE_EVENT_HUB_CONSUMER_NAME",
            )?
            .set_default("event_hub.hub_name_variable", "AZURE_EVENT_HUB_NAME")?
            .set_default("event_hub.starting_position", "-1")
    }
}

/// Reads a variable from the process environment
pub fn system_environment(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// Resolves a required variable; present-but-empty counts as unset
fn require_variable<F>(lookup: &F, name: &str) -> Result<String, ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigurationError::MissingVariable {
            variable: name.to_string(),
        })
}

/// Fully resolved configuration handed to the change simulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    pub base_dir: BaseDir,
    pub container: ContainerName,
    pub key_stem: KeyStem,
    pub suffixes: Vec<KeySuffix>,
    pub iterations: WriteIterations,
    pub content_prefix: ContentPrefix,
    pub warmup: DelayMillis,
    pub inter_write: DelayMillis,
    pub create_container: bool,
}

impl SimulationConfig {
    pub fn from_settings<F>(
        settings: &SimulationSettings,
        lookup: F,
    ) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_dir = match settings.base_dir_source {
            BaseDirSource::Literal => settings.base_dir.clone(),
            BaseDirSource::Env => {
                let raw = require_variable(&lookup, &settings.base_dir_variable)?;
                BaseDir::try_new(PathBuf::from(raw)).map_err(|e| {
                    ConfigurationError::invalid("simulation.base_dir_variable", e.to_string())
                })?
            }
        };

        if settings.suffixes.is_empty() {
            return Err(ConfigurationError::invalid(
                "simulation.suffixes",
                "at least one suffix is required",
            ));
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = settings.suffixes.iter().find(|s| !seen.insert(*s)) {
            return Err(ConfigurationError::invalid(
                "simulation.suffixes",
                format!("suffix '{duplicate}' is listed more than once"),
            ));
        }

        Ok(Self {
            base_dir,
            container: settings.container.clone(),
            key_stem: settings.key_stem.clone(),
            suffixes: settings.suffixes.clone(),
            iterations: settings.iterations,
            content_prefix: settings.content_prefix.clone(),
            warmup: settings.warmup_ms,
            inter_write: settings.inter_write_ms,
            create_container: settings.create_container,
        })
    }

    /// Directory the key files are written into
    pub fn container_dir(&self) -> PathBuf {
        self.base_dir.as_ref().join(self.container.as_ref())
    }

    /// The ordered writes a run performs against this configuration
    pub fn plan(&self) -> SimulationPlan {
        SimulationPlan::new(
            &self.container_dir(),
            &self.key_stem,
            &self.suffixes,
            self.iterations,
            &self.content_prefix,
        )
    }

    /// Number of writes a full run performs
    pub fn total_writes(&self) -> usize {
        self.suffixes.len() * self.iterations.into_inner() as usize
    }
}

/// Resolved event-hub connection parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventHubConnection {
    pub connection_string: ConnectionString,
    pub consumer_group: String,
    pub hub_name: String,
    pub starting_position: StartingPosition,
}

impl EventHubConnection {
    pub fn from_settings<F>(settings: &EventHubSettings, lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let connection_string = ConnectionString::try_new(require_variable(
            &lookup,
            &settings.connection_string_variable,
        )?)
        .map_err(|e| {
            ConfigurationError::invalid("event_hub.connection_string_variable", e.to_string())
        })?;
        let consumer_group = require_variable(&lookup, &settings.consumer_group_variable)?;
        let hub_name = require_variable(&lookup, &settings.hub_name_variable)?;
        let starting_position = settings
            .starting_position
            .parse::<StartingPosition>()
            .map_err(|e| {
                ConfigurationError::invalid("event_hub.starting_position", e.to_string())
            })?;

        Ok(Self {
            connection_string,
            consumer_group,
            hub_name,
            starting_position,
        })
    }
}
