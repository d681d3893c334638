//! Type definitions for the ingestion module.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

/// A user-selected file whose size is known before any read happens.
///
/// Implementations read the whole file as text. The size is consulted first
/// so oversized inputs are rejected without touching their contents.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Size in bytes as reported by the picker or filesystem.
    fn size_bytes(&self) -> u64;

    /// Display name used in log lines.
    fn name(&self) -> &str;

    /// Read the full contents as text.
    async fn read_text(&self) -> io::Result<String>;
}

/// A file on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    display_name: String,
    size: u64,
}

impl LocalFile {
    /// Stat `path` and capture its size. The contents are not read.
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            path,
            display_name,
            size: metadata.len(),
        })
    }
}

#[async_trait]
impl FileSource for LocalFile {
    fn size_bytes(&self) -> u64 {
        self.size
    }

    fn name(&self) -> &str {
        &self.display_name
    }

    async fn read_text(&self) -> io::Result<String> {
        let bytes = tokio::fs::read(&self.path).await?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
