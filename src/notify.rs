//! Outbound sinks: user notifications and the clipboard.

use std::io;
use std::path::PathBuf;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Receives `(kind, message)` notification events. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);
}

/// Write-only text sink used by the extract tool's export.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> io::Result<()>;
}

/// Logs notifications through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Success => tracing::info!(notice = message, "Success"),
            NoticeKind::Error => tracing::warn!(notice = message, "Error"),
        }
    }
}

/// Clipboard stand-in for terminals: exported text is written to a file.
#[derive(Debug, Clone)]
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Clipboard for FileClipboard {
    fn write_text(&self, text: &str) -> io::Result<()> {
        std::fs::write(&self.path, text)?;
        tracing::debug!(path = %self.path.display(), bytes = text.len(), "Export written");
        Ok(())
    }
}
