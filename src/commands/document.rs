//! Document Commands
//!
//! Reading, patching, resetting and moving the current prompt document in and
//! out of plain JSON.

use std::path::{Path, PathBuf};

use prompt_studio_core::{PromptDocument, PromptDocumentPatch};

use super::files::{document_file_name, read_import_file, write_export_file};
use super::{read_store, write_store};
use crate::models::response::CommandResponse;
use crate::services::templates::TemplateStore;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

pub async fn get_document(state: &AppState) -> CommandResponse<PromptDocument> {
    read_store(state, |store| Ok(store.document().clone())).await
}

/// Merge a partial update and return the resulting document
pub async fn update_document(
    state: &AppState,
    patch: PromptDocumentPatch,
) -> CommandResponse<PromptDocument> {
    write_store(state, |store| {
        store.update_document(patch)?;
        Ok(store.document().clone())
    })
    .await
}

pub async fn reset_document(state: &AppState) -> CommandResponse<PromptDocument> {
    write_store(state, |store| {
        store.reset_document()?;
        Ok(store.document().clone())
    })
    .await
}

/// The current document as pretty JSON
pub async fn export_json(state: &AppState) -> CommandResponse<String> {
    read_store(state, |store| store.export_json()).await
}

/// Write the current document to `dir` as `prompt-<epoch-ms>.json`
pub async fn export_json_file(state: &AppState, dir: &Path) -> CommandResponse<PathBuf> {
    let json = match export_json(state).await {
        CommandResponse {
            data: Some(json), ..
        } => json,
        failed => return CommandResponse::err(failed.error.unwrap_or_default()),
    };
    write_export_file(dir, &document_file_name(), &json)
        .await
        .into()
}

/// Replace the document with a complete document given as JSON text
pub async fn import_json(state: &AppState, text: &str) -> CommandResponse<PromptDocument> {
    write_store(state, |store| replace_document(store, text)).await
}

/// Replace the document with the contents of a JSON file
pub async fn import_json_file(state: &AppState, path: &Path) -> CommandResponse<PromptDocument> {
    match read_import_file(path).await {
        Ok(text) => import_json(state, &text).await,
        Err(e) => CommandResponse::err(e.user_message()),
    }
}

fn replace_document(
    store: &mut TemplateStore,
    text: &str,
) -> AppResult<PromptDocument> {
    if !store.import_json(text)? {
        return Err(AppError::parse("not a complete prompt document"));
    }
    Ok(store.document().clone())
}
