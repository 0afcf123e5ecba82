//! Target files and the writes applied to them

use super::config_types::{ContentPrefix, KeyStem, KeySuffix};
use nutype::nutype;
use std::path::PathBuf;

/// Zero-based iteration index of a write against one target
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    AsRef,
    Display
))]
pub struct WriteIndex(u32);

/// Literal content written to a target
#[nutype(derive(Debug, Clone, PartialEq, Eq, Hash, AsRef, Display))]
pub struct Content(String);

impl Content {
    /// Content for the given iteration, e.g. `content_0`
    pub fn for_iteration(prefix: &ContentPrefix, index: WriteIndex) -> Self {
        Self::new(format!("{prefix}{index}"))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.as_ref().as_bytes()
    }
}

/// A key file inside the container directory, `<dir>/<stem><suffix>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetPath {
    directory: PathBuf,
    key_stem: KeyStem,
    suffix: KeySuffix,
}

impl TargetPath {
    pub fn new(directory: impl Into<PathBuf>, key_stem: KeyStem, suffix: KeySuffix) -> Self {
        Self {
            directory: directory.into(),
            key_stem,
            suffix,
        }
    }

    pub fn suffix(&self) -> &KeySuffix {
        &self.suffix
    }

    /// File name of the key, stem followed by suffix
    pub fn key_name(&self) -> String {
        format!("{}{}", self.key_stem, self.suffix)
    }

    pub fn file_path(&self) -> PathBuf {
        self.directory.join(self.key_name())
    }
}

/// One overwrite of a target with the content for an iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteEvent {
    pub target: TargetPath,
    pub index: WriteIndex,
    pub content: Content,
}

impl WriteEvent {
    pub fn new(target: TargetPath, index: WriteIndex, prefix: &ContentPrefix) -> Self {
        Self {
            content: Content::for_iteration(prefix, index),
            target,
            index,
        }
    }
}
