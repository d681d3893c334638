//! Size-guarded text ingestion for user-selected files.

use crate::error::IngestionError;
use crate::ingestion::types::FileSource;

/// Largest file accepted for ingestion (5 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Read `file` into text, enforcing [`MAX_UPLOAD_BYTES`].
///
/// The size check runs before any read is attempted. The decoded text is
/// returned verbatim; callers place it into their own input buffer.
pub async fn ingest<F: FileSource + ?Sized>(file: &F) -> Result<String, IngestionError> {
    let size = file.size_bytes();
    if size > MAX_UPLOAD_BYTES {
        tracing::warn!(
            file = file.name(),
            size,
            limit = MAX_UPLOAD_BYTES,
            "Rejecting oversized file"
        );
        return Err(IngestionError::TooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }

    let text = file.read_text().await.map_err(|e| {
        tracing::warn!(file = file.name(), error = %e, "File read failed");
        IngestionError::ReadFailure(e.to_string())
    })?;

    tracing::debug!(file = file.name(), chars = text.chars().count(), "File ingested");
    Ok(text)
}
