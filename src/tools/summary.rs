use crate::dispatch::{ToolInput, ToolKind};
use crate::error::{IngestionError, Result};
use crate::ingestion::{self, FileSource};
use crate::normalize::ToolResult;
use crate::notify::NoticeKind;
use crate::state::{Phase, ToolState};
use crate::tools::{ToolContext, ToolController};
use tokio::sync::broadcast;

/// Summarization of pasted or uploaded text.
pub struct SummaryTool {
    inner: ToolController,
}

impl SummaryTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self {
            inner: ToolController::new(ToolKind::Summary, ctx),
        }
    }

    pub async fn submit(&self, text: impl Into<String>) -> Result<ToolResult> {
        self.inner
            .submit(ToolInput::Summary { text: text.into() })
            .await
    }

    /// Read `file` as input text for a later `submit`.
    ///
    /// Emits a notification either way but never changes the tool's phase.
    pub async fn load_file<F: FileSource + ?Sized>(&self, file: &F) -> Result<String> {
        match ingestion::ingest(file).await {
            Ok(text) => {
                self.inner
                    .notifier()
                    .notify(NoticeKind::Success, "File loaded successfully!");
                Ok(text)
            }
            Err(e) => {
                let message = match e {
                    IngestionError::TooLarge { .. } => "File size exceeds 5MB limit",
                    IngestionError::ReadFailure(_) => "Failed to read file",
                };
                self.inner.notifier().notify(NoticeKind::Error, message);
                Err(e.into())
            }
        }
    }

    pub async fn clear(&self) -> Result<()> {
        self.inner.clear().await
    }

    pub async fn state(&self) -> ToolState {
        self.inner.state().await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Phase> {
        self.inner.subscribe()
    }
}
