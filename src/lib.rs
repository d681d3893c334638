//! Analyst client - orchestration for the AI Market Analyst document tools
//!
//! Drives question answering, summarization and structured extraction
//! against the analyst backend, either through each tool's dedicated
//! endpoint (manual mode) or through the server-side router (autonomous
//! mode), and normalizes both response styles into one result per tool.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod ingestion;
pub mod mode;
pub mod normalize;
pub mod notify;
pub mod schema;
pub mod state;
pub mod tools;
pub mod transport;

// Re-export key types for convenience
pub use config::Config;
pub use dispatch::{build_request, Endpoint, ToolInput, ToolKind, ToolRequest};
pub use error::{Result, ToolError};
pub use mode::{Mode, ModeSwitch};
pub use normalize::{normalize, Extraction, SourceDocument, ToolResult};
pub use notify::{Clipboard, NoticeKind, Notifier, TracingNotifier};
pub use state::{Phase, ToolState};
pub use tools::{ExtractTool, QaTool, SummaryTool, ToolContext, Toolbox};
pub use transport::{HttpTransport, Transport};
