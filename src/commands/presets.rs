//! Preset Commands

use prompt_studio_core::PromptDocument;

use super::{read_store, write_store};
use crate::models::response::CommandResponse;
use crate::state::AppState;
use crate::utils::error::AppError;

/// Preset names, sorted
pub async fn list_presets(state: &AppState) -> CommandResponse<Vec<String>> {
    read_store(state, |store| Ok(store.preset_names())).await
}

/// Save the current document under `name`, replacing an existing preset
pub async fn save_preset(state: &AppState, name: &str) -> CommandResponse<Vec<String>> {
    write_store(state, |store| {
        store.save_preset(name)?;
        Ok(store.preset_names())
    })
    .await
}

pub async fn load_preset(state: &AppState, name: &str) -> CommandResponse<PromptDocument> {
    write_store(state, |store| {
        if !store.load_preset(name)? {
            return Err(AppError::not_found(format!("Preset not found: {}", name)));
        }
        Ok(store.document().clone())
    })
    .await
}
