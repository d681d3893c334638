use crate::dispatch::{ToolInput, ToolKind};
use crate::error::{Result, ToolError};
use crate::normalize::{Extraction, ToolResult};
use crate::notify::{Clipboard, NoticeKind};
use crate::schema::SchemaPreset;
use crate::state::{Phase, ToolState};
use crate::tools::{ToolContext, ToolController};
use tokio::sync::broadcast;

/// Editable inputs produced by loading a schema preset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedExample {
    /// Pretty-printed schema text.
    pub schema: String,
    /// Sample text, when the preset ships one.
    pub text: Option<String>,
}

/// Structured extraction driven by a user-authored schema.
pub struct ExtractTool {
    inner: ToolController,
}

impl ExtractTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self {
            inner: ToolController::new(ToolKind::Extract, ctx),
        }
    }

    /// Submit `text` with raw `schema` text. The schema is validated before
    /// anything is sent.
    pub async fn submit(
        &self,
        text: impl Into<String>,
        schema: impl Into<String>,
    ) -> Result<ToolResult> {
        self.inner
            .submit(ToolInput::Extract {
                text: text.into(),
                schema: schema.into(),
            })
            .await
    }

    pub fn load_example(&self, preset: SchemaPreset) -> LoadedExample {
        let example = LoadedExample {
            schema: preset.schema().to_pretty_text(),
            text: preset.sample_text().map(str::to_string),
        };
        self.inner
            .notifier()
            .notify(NoticeKind::Success, "Example loaded");
        example
    }

    /// Copy the extracted fields, pretty-printed, to `clipboard`.
    ///
    /// Returns `Ok(false)` without writing anything unless the last
    /// submission succeeded.
    pub async fn export_result(&self, clipboard: &dyn Clipboard) -> Result<bool> {
        let state = self.inner.state().await;
        let fields = match (state.phase(), state.last_result()) {
            (Phase::Succeeded, Some(ToolResult::Extraction(Extraction::Fields(fields)))) => fields,
            _ => return Ok(false),
        };

        let text = serde_json::to_string_pretty(fields).map_err(|e| ToolError::Export(e.to_string()))?;
        match clipboard.write_text(&text) {
            Ok(()) => {
                self.inner
                    .notifier()
                    .notify(NoticeKind::Success, "Copied to clipboard!");
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Clipboard write failed");
                self.inner
                    .notifier()
                    .notify(NoticeKind::Error, "Failed to copy to clipboard");
                Err(ToolError::Export(e.to_string()))
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
