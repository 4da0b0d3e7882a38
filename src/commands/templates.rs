//! Template Library Commands
//!
//! Saving, loading, searching and exchanging templates.

use std::path::{Path, PathBuf};

use prompt_studio_core::template::export_file_name;
use prompt_studio_core::{PromptDocument, TemplateMetadata, TemplateSnapshot};
use serde::Serialize;

use super::files::{read_import_file, write_export_file};
use super::{read_store, write_store};
use crate::models::response::CommandResponse;
use crate::models::template::{LibraryFilter, TemplateSummary, UserTemplate};
use crate::services::templates::render_template_file;
use crate::state::AppState;
use crate::utils::error::AppError;

/// A rendered template file and its suggested name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateExport {
    pub file_name: String,
    pub contents: String,
}

pub async fn list_templates(
    state: &AppState,
    filter: LibraryFilter,
) -> CommandResponse<Vec<TemplateSummary>> {
    read_store(state, |store| Ok(store.search_templates(&filter))).await
}

pub async fn recent_templates(state: &AppState) -> CommandResponse<Vec<TemplateSummary>> {
    read_store(state, |store| Ok(store.recent_templates())).await
}

pub async fn save_as_template(
    state: &AppState,
    metadata: TemplateMetadata,
) -> CommandResponse<UserTemplate> {
    write_store(state, |store| store.save_as_template(metadata)).await
}

/// Returns whether a template was removed
pub async fn delete_template(state: &AppState, id: &str) -> CommandResponse<bool> {
    write_store(state, |store| store.delete_template(id)).await
}

/// Returns the new favorite flag
pub async fn toggle_favorite(state: &AppState, id: &str) -> CommandResponse<bool> {
    write_store(state, |store| {
        store
            .toggle_favorite(id)?
            .ok_or_else(|| AppError::not_found(format!("Template not found: {}", id)))
    })
    .await
}

/// Load a template into the editor without moving the wizard
pub async fn load_template(state: &AppState, id: &str) -> CommandResponse<PromptDocument> {
    write_store(state, |store| {
        if !store.load_template(id)? {
            return Err(AppError::not_found(format!("Template not found: {}", id)));
        }
        Ok(store.document().clone())
    })
    .await
}

/// Pick a template from the library: load it and go to the first step
pub async fn select_template(state: &AppState, id: &str) -> CommandResponse<PromptDocument> {
    write_store(state, |store| {
        if !store.select_template(id)? {
            return Err(AppError::not_found(format!("Template not found: {}", id)));
        }
        Ok(store.document().clone())
    })
    .await
}

pub async fn export_template(state: &AppState, id: &str) -> CommandResponse<TemplateExport> {
    read_store(state, |store| {
        let template = store
            .find_template(id)
            .ok_or_else(|| AppError::not_found(format!("Template not found: {}", id)))?;
        let snapshot = template.snapshot();
        Ok(TemplateExport {
            file_name: export_file_name(&snapshot.metadata().name),
            contents: render_template_file(snapshot)?,
        })
    })
    .await
}

/// Write a template to `dir/<slug>.promptstudio`
pub async fn export_template_file(
    state: &AppState,
    id: &str,
    dir: &Path,
) -> CommandResponse<PathBuf> {
    let export = match export_template(state, id).await {
        CommandResponse {
            data: Some(export), ..
        } => export,
        failed => return CommandResponse::err(failed.error.unwrap_or_default()),
    };
    write_export_file(dir, &export.file_name, &export.contents)
        .await
        .into()
}

pub async fn import_template(state: &AppState, content: &str) -> CommandResponse<UserTemplate> {
    write_store(state, |store| store.import_template(content)).await
}

pub async fn import_template_file(state: &AppState, path: &Path) -> CommandResponse<UserTemplate> {
    match read_import_file(path).await {
        Ok(content) => import_template(state, &content).await,
        Err(e) => CommandResponse::err(e.user_message()),
    }
}
