//! Tool controllers.
//!
//! One controller per tool owns that tool's [`ToolState`]. A submission
//! runs validate → dispatch → transport → normalize and records the outcome.
//!
//! # Concurrency
//! The state lock is held while validating and building the request, then
//! released for the transport call. A submit that arrives while another is
//! in flight sees `Submitting` and is rejected with [`ToolError::Busy`]
//! without touching the in-flight submission's outcome. Controllers share
//! nothing mutable with each other.

pub mod extract;
pub mod qa;
pub mod summary;

pub use extract::ExtractTool;
pub use qa::QaTool;
pub use summary::SummaryTool;

use crate::dispatch::{build_request, ToolInput, ToolKind};
use crate::error::{Result, ToolError};
use crate::mode::ModeSwitch;
use crate::normalize::{normalize, Extraction, ToolResult};
use crate::notify::{NoticeKind, Notifier};
use crate::state::{Phase, ToolState};
use crate::transport::Transport;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, Mutex};
use tracing::Instrument;

const PHASE_CHANNEL_CAPACITY: usize = 32;

/// Collaborators shared by every tool.
#[derive(Clone)]
pub struct ToolContext {
    pub mode: Arc<ModeSwitch>,
    pub transport: Arc<dyn Transport>,
    pub notifier: Arc<dyn Notifier>,
}

impl ToolContext {
    pub fn new(
        mode: Arc<ModeSwitch>,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            mode,
            transport,
            notifier,
        }
    }
}

/// The three tools plus the mode flag they read.
pub struct Toolbox {
    pub mode: Arc<ModeSwitch>,
    pub qa: QaTool,
    pub summary: SummaryTool,
    pub extract: ExtractTool,
}

impl Toolbox {
    pub fn new(ctx: ToolContext) -> Self {
        Self {
            mode: Arc::clone(&ctx.mode),
            qa: QaTool::new(ctx.clone()),
            summary: SummaryTool::new(ctx.clone()),
            extract: ExtractTool::new(ctx),
        }
    }
}

/// User-facing texts for one tool.
struct Messages {
    success: &'static str,
    fallback: &'static str,
}

fn messages(kind: ToolKind) -> Messages {
    match kind {
        ToolKind::Qa => Messages {
            success: "Question answered successfully!",
            fallback: "Failed to get answer",
        },
        ToolKind::Summary => Messages {
            success: "Summary generated successfully!",
            fallback: "Failed to generate summary",
        },
        ToolKind::Extract => Messages {
            success: "Data extracted successfully!",
            fallback: "Failed to extract data",
        },
    }
}

/// Required-field checks run before the dispatcher sees the input.
fn local_check(input: &ToolInput) -> std::result::Result<(), (&'static str, &'static str)> {
    match input {
        ToolInput::Qa { question } if question.trim().is_empty() => {
            Err(("question", "Please enter a question"))
        }
        ToolInput::Summary { text } if text.trim().is_empty() => {
            Err(("text", "Please enter text to summarize"))
        }
        ToolInput::Extract { text, .. } if text.trim().is_empty() => {
            Err(("text", "Please enter text to extract from"))
        }
        ToolInput::Extract { schema, .. } if schema.trim().is_empty() => {
            Err(("schema", "Please enter a JSON schema"))
        }
        _ => Ok(()),
    }
}

/// Lifecycle engine shared by the QA, summary and extract tools.
///
/// Only reachable through the typed tool wrappers, so the input always
/// matches `kind`.
pub(crate) struct ToolController {
    kind: ToolKind,
    ctx: ToolContext,
    state: Mutex<ToolState>,
    phases: broadcast::Sender<Phase>,
}

impl ToolController {
    pub fn new(kind: ToolKind, ctx: ToolContext) -> Self {
        let (phases, _) = broadcast::channel(PHASE_CHANNEL_CAPACITY);
        Self {
            kind,
            ctx,
            state: Mutex::new(ToolState::default()),
            phases,
        }
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> ToolState {
        self.state.lock().await.clone()
    }

    /// Receive every phase change from now on, in order.
    pub fn subscribe(&self) -> broadcast::Receiver<Phase> {
        self.phases.subscribe()
    }

    /// Run one submission to completion.
    ///
    /// The mode is read once, after local checks pass, and used for both
    /// dispatch and normalization of this submission.
    pub async fn submit(&self, input: ToolInput) -> Result<ToolResult> {
        let request_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("submit", kind = %self.kind, %request_id);
        self.run(input).instrument(span).await
    }

    async fn run(&self, input: ToolInput) -> Result<ToolResult> {
        let (mode, request) = {
            let mut state = self.state.lock().await;
            if let Err(e) = state.begin_validation() {
                tracing::debug!(error = %e, "Submission rejected");
                return Err(e);
            }
            self.publish(Phase::Validating);

            if let Err((field, message)) = local_check(&input) {
                state.reject_validation()?;
                self.publish(Phase::Idle);
                self.ctx.notifier.notify(NoticeKind::Error, message);
                self.record_outcome("rejected");
                return Err(ToolError::Validation {
                    field,
                    message: message.to_string(),
                });
            }

            let mode = self.ctx.mode.current();
            state.begin_submission()?;
            self.publish(Phase::Submitting);

            match build_request(mode, &input) {
                Ok(request) => (mode, request),
                Err(e) => {
                    let message = e.to_string();
                    state.fail(message.clone(), None)?;
                    self.publish(Phase::Failed);
                    self.ctx.notifier.notify(NoticeKind::Error, &message);
                    self.record_outcome("failed");
                    return Err(e.into());
                }
            }
        };

        tracing::info!(mode = %mode, endpoint = request.endpoint.path(), "Submitting");
        let started = Instant::now();
        let response = self.ctx.transport.post(&request).await;
        metrics::histogram!("tool_request_duration_seconds", "kind" => self.kind.as_str())
            .record(started.elapsed().as_secs_f64());

        let mut state = self.state.lock().await;
        let msgs = messages(self.kind);

        let envelope = match response {
            Ok(envelope) => envelope,
            Err(e) => {
                let message = e.display_message(msgs.fallback);
                tracing::warn!(status = ?e.status, error = %message, "Transport failed");
                state.fail(message.clone(), self.error_result(&message, None))?;
                self.publish(Phase::Failed);
                self.ctx.notifier.notify(NoticeKind::Error, &message);
                self.record_outcome("failed");
                return Err(e.into());
            }
        };

        match normalize(self.kind, mode, &envelope) {
            Ok(result) => {
                state.succeed(result.clone())?;
                self.publish(Phase::Succeeded);
                self.ctx.notifier.notify(NoticeKind::Success, msgs.success);
                self.record_outcome("succeeded");
                tracing::info!(elapsed_ms = started.elapsed().as_millis() as u64, "Submission succeeded");
                Ok(result)
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(error = %message, "Response did not match the expected shape");
                let raw = envelope.to_string();
                state.fail(message.clone(), self.error_result(&message, Some(raw)))?;
                self.publish(Phase::Failed);
                self.ctx.notifier.notify(NoticeKind::Error, &message);
                self.record_outcome("failed");
                Err(e.into())
            }
        }
    }

    /// Reset to `Idle`. Fails unless the last submission has finished.
    pub async fn clear(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.clear()?;
        self.publish(Phase::Idle);
        self.ctx.notifier.notify(NoticeKind::Success, "Cleared");
        Ok(())
    }

    pub(crate) fn notifier(&self) -> &dyn Notifier {
        self.ctx.notifier.as_ref()
    }

    /// Error-shaped result rendered in place of the tool's output.
    fn error_result(&self, message: &str, raw_text: Option<String>) -> Option<ToolResult> {
        let result = match self.kind {
            ToolKind::Qa => ToolResult::Answer {
                answer_text: format!("Error: {}", message),
                source_documents: Vec::new(),
            },
            ToolKind::Summary => ToolResult::Summary {
                summary_text: format!("Error: {}", message),
            },
            ToolKind::Extract => ToolResult::Extraction(Extraction::Error {
                error_message: message.to_string(),
                raw_text,
            }),
        };
        Some(result)
    }

    fn publish(&self, phase: Phase) {
        tracing::trace!(phase = ?phase, "Phase change");
        // No receivers is fine
        let _ = self.phases.send(phase);
    }

    fn record_outcome(&self, outcome: &'static str) {
        metrics::counter!(
            "tool_submissions_total",
            "kind" => self.kind.as_str(),
            "outcome" => outcome
        )
        .increment(1);
    }
}
