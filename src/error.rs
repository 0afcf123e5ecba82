use crate::config::ConfigurationError;
use crate::domain::partition::CheckpointError;
use derive_more::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Filesystem operation that was in flight when an I/O error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FileOperation {
    #[display("open")]
    Open,
    #[display("write")]
    Write,
    #[display("flush")]
    Flush,
    #[display("create directory")]
    CreateDirectory,
}

/// Change simulator error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("File system error: failed to {operation} {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        operation: FileOperation,
        #[source]
        source: std::io::Error,
    },

    #[error("Upstream callback error: {0}")]
    UpstreamCallback(#[from] CheckpointError),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

impl Error {
    pub fn file_system(path: &Path, operation: FileOperation, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.to_path_buf(),
            operation,
            source,
        }
    }

    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::InvalidStateTransition(message.into())
    }

    /// Returns the I/O error kind when this is a filesystem failure
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::FileSystem { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
