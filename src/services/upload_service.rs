use crate::api::error::AppError;
use crate::config::AppConfig;
use crate::services::preview::{SheetPreview, extract_preview};
use crate::services::scratch::ScratchFile;
use crate::utils::validation::ValidatedFilename;
use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use tracing::Span;

/// Runs an accepted upload through scratch persistence and preview extraction.
pub struct UploadService {
    config: Arc<AppConfig>,
}

impl UploadService {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }

    /// Writes `contents` to a scratch file, summarises it and removes the
    /// scratch file again, whatever the parse outcome.
    pub async fn preview(
        &self,
        filename: &ValidatedFilename,
        contents: Bytes,
    ) -> Result<SheetPreview, AppError> {
        let dir = self.config.upload_dir.clone();
        let extension = filename.extension.clone();
        let preview_rows = self.config.preview_rows;
        let span = Span::current();

        tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            preview_from_scratch(&dir, &extension, &contents, preview_rows)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Preview task failed: {}", e)))?
    }
}

fn preview_from_scratch(
    dir: &Path,
    extension: &str,
    contents: &[u8],
    preview_rows: usize,
) -> Result<SheetPreview, AppError> {
    let scratch = ScratchFile::create(dir, extension, contents).map_err(|e| {
        AppError::Internal(format!(
            "Failed to write scratch file in {}: {}",
            dir.display(),
            e
        ))
    })?;

    tracing::debug!(
        scratch_id = %scratch.id(),
        bytes = contents.len(),
        "Upload written to scratch"
    );

    let result = extract_preview(scratch.path(), preview_rows);

    let scratch_id = scratch.id();
    if let Err(e) = scratch.close() {
        tracing::warn!("Failed to remove scratch file {}: {}", scratch_id, e);
    }

    Ok(result?)
}
