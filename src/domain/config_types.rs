//! Type-safe configuration types
//!
//! This module provides domain-specific types for configuration values,
//! ensuring validation at boundaries and preventing primitive obsession.

use derive_more::Display;
use nutype::nutype;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

fn is_plain_name(name: &str) -> bool {
    !name.contains('/') && !name.contains('\\') && name != "." && name != ".."
}

/// Base directory under which the container directory lives
#[nutype(
    validate(predicate = |path| !path.as_os_str().is_empty()),
    derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, AsRef)
)]
pub struct BaseDir(PathBuf);

/// Name of the directory that holds the simulated keys
#[nutype(
    validate(not_empty, len_char_max = 255, predicate = |name| is_plain_name(name)),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct ContainerName(String);

impl Default for ContainerName {
    fn default() -> Self {
        Self::try_new("my-container".to_string()).expect("Default container name is valid")
    }
}

/// File name stem shared by every simulated key
#[nutype(
    validate(not_empty, len_char_max = 200, predicate = |stem| is_plain_name(stem)),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct KeyStem(String);

impl Default for KeyStem {
    fn default() -> Self {
        Self::try_new("my-key".to_string()).expect("Default key stem is valid")
    }
}

/// Suffix appended to the key stem; the empty suffix is valid
#[nutype(
    validate(len_char_max = 55, predicate = |suffix| !suffix.contains('/') && !suffix.contains('\\')),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct KeySuffix(String);

/// Prefix of the literal content written on each iteration
#[nutype(
    validate(len_char_max = 1024),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct ContentPrefix(String);

impl Default for ContentPrefix {
    fn default() -> Self {
        Self::try_new("content_".to_string()).expect("Default content prefix is valid")
    }
}

/// Number of overwrites applied to each target
#[nutype(
    validate(predicate = |count| (1..=1000).contains(count)),
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
pub struct WriteIterations(u32);

impl Default for WriteIterations {
    fn default() -> Self {
        Self::try_new(2).expect("Default iteration count is valid")
    }
}

/// A delay expressed in milliseconds
#[nutype(derive(
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
))]
pub struct DelayMillis(u64);

impl DelayMillis {
    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.into_inner())
    }
}

/// Event-hub connection string (secured)
#[nutype(validate(not_empty), derive(Clone, PartialEq, Eq, AsRef))]
pub struct ConnectionString(String);

impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionString(***)")
    }
}

impl fmt::Display for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

/// Where the base directory comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, Display)]
#[serde(rename_all = "lowercase")]
pub enum BaseDirSource {
    /// Use the configured literal path
    #[default]
    #[display("literal")]
    Literal,
    /// Read the path from an environment variable at startup
    #[display("env")]
    Env,
}

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log line layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}
