//! File Helpers
//!
//! Reading import files and writing exports. One read per invocation; the
//! extension check happens before touching the disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use prompt_studio_core::template::has_template_extension;

use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::ensure_dir;

/// Read a `.json` or `.promptstudio` file
pub async fn read_import_file(path: &Path) -> AppResult<String> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    if !has_template_extension(file_name) {
        return Err(AppError::validation(format!(
            "Unsupported file type: {}. Use a .json or .promptstudio file.",
            path.display()
        )));
    }
    tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
        // Not UTF-8 text
        ErrorKind::InvalidData => AppError::parse(e.to_string()),
        _ => AppError::Io(e),
    })
}

/// Write `contents` to `dir/file_name`, creating `dir` if needed
pub async fn write_export_file(dir: &Path, file_name: &str, contents: &str) -> AppResult<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, contents).await?;
    tracing::info!(path = %path.display(), "wrote export file");
    Ok(path)
}

/// Default name for a plain document export
pub fn document_file_name() -> String {
    format!("prompt-{}.json", Utc::now().timestamp_millis())
}
