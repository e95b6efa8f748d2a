//! Where recordings come from.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{PlayerError, Result};

/// Asynchronous provider of a recording document.
///
/// The player fetches from its source on the first toggle-play and reports
/// the result back through the event queue.
#[async_trait]
pub trait RecordingSource: Send + Sync {
    /// Human-readable origin, for logs
    fn describe(&self) -> String;

    /// Fetch the full recording text
    async fn fetch(&self) -> Result<String>;
}

/// Recording stored in a local file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordingSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| PlayerError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

/// Recording already held in memory.
#[derive(Debug, Clone)]
pub struct InlineSource {
    body: String,
}

impl InlineSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

#[async_trait]
impl RecordingSource for InlineSource {
    fn describe(&self) -> String {
        format!("inline ({} bytes)", self.body.len())
    }

    async fn fetch(&self) -> Result<String> {
        Ok(self.body.clone())
    }
}
