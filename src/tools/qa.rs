use crate::dispatch::{ToolInput, ToolKind};
use crate::error::Result;
use crate::normalize::ToolResult;
use crate::state::{Phase, ToolState};
use crate::tools::{ToolContext, ToolController};
use tokio::sync::broadcast;

/// Question answering over the indexed documents.
///
/// Always targets the dedicated QA endpoint, whatever the mode.
pub struct QaTool {
    inner: ToolController,
}

impl QaTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self {
            inner: ToolController::new(ToolKind::Qa, ctx),
        }
    }

    pub async fn submit(&self, question: impl Into<String>) -> Result<ToolResult> {
        self.inner
            .submit(ToolInput::Qa {
                question: question.into(),
            })
            .await
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
