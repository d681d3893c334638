//! Ingestion module for reading user-selected files into tool input.
//!
//! Files are checked against a size ceiling before their contents are read,
//! then decoded as UTF-8 text.

pub mod guard;
pub mod types;

pub use guard::{ingest, MAX_UPLOAD_BYTES};
pub use types::{FileSource, LocalFile};
