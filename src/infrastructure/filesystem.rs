//! Filesystem-backed change sink
//!
//! Every overwrite opens the key file with create + truncate, writes the
//! full content and flushes before the handle is dropped. The handle is
//! scoped to a single call, so it is released on success and on every
//! error path alike. Parent directories are never created implicitly.

use crate::application::simulator::ChangeSink;
use crate::domain::{Content, TargetPath};
use crate::error::{Error, FileOperation, Result};
use crate::infrastructure::log_messages::simulator as msg;
use async_trait::async_trait;
use std::path::Path;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemSink;

impl FileSystemSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChangeSink for FileSystemSink {
    async fn prepare_directory(&self, directory: &Path) -> Result<()> {
        fs::create_dir_all(directory)
            .await
            .map_err(|source| Error::file_system(directory, FileOperation::CreateDirectory, source))
    }

    async fn overwrite(&self, target: &TargetPath, content: &Content) -> Result<()> {
        let path = target.file_path();

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .await
            .map_err(|source| Error::file_system(&path, FileOperation::Open, source))?;

        file.write_all(content.as_bytes())
            .await
            .map_err(|source| Error::file_system(&path, FileOperation::Write, source))?;

        file.flush()
            .await
            .map_err(|source| Error::file_system(&path, FileOperation::Flush, source))?;

        debug!(
            path = %path.display(),
            bytes = content.as_bytes().len(),
            "{}",
            msg::KEY_FILE_FLUSHED
        );
        Ok(())
    }
}
