//! Template Store
//!
//! Owns the current prompt document, the user's templates, named presets, the
//! recency list and the wizard position. Nothing else mutates them.
//!
//! Every mutation is computed on a copy of the state, persisted, and only then
//! swapped in. A failed operation (bad input or a storage error) leaves the
//! store exactly as it was.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use prompt_studio_core::{
    sanitize_tree, validate_template_file, PromptDocument, PromptDocumentPatch, TemplateFile,
    TemplateMetadata, TemplateSnapshot, Wizard,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::catalog::{builtin_templates, find_builtin};
use crate::models::template::{LibraryFilter, TemplateRef, TemplateSummary, UserTemplate};
use crate::storage::kv::{KeyValueStore, STUDIO_STATE_KEY};
use crate::utils::error::{AppError, AppResult};

/// Maximum number of ids kept in the recency list
pub const RECENT_LIMIT: usize = 5;

const IMPORTED_NAME: &str = "Imported Template";
const IMPORTED_DESCRIPTION: &str = "Imported from file";

/// The persisted slice of the editor (`prompt-storage`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudioState {
    #[serde(rename = "currentStep")]
    pub wizard: Wizard,
    pub prompt_data: PromptDocument,
    pub presets: BTreeMap<String, PromptDocument>,
    pub user_templates: Vec<UserTemplate>,
    /// Template ids, most recent first
    pub recent_templates: Vec<String>,
}

impl StudioState {
    fn user_template_mut(&mut self, id: &str) -> Option<&mut UserTemplate> {
        self.user_templates.iter_mut().find(|t| t.id == id)
    }

    fn touch_recent(&mut self, id: &str) {
        self.recent_templates.retain(|existing| existing != id);
        self.recent_templates.insert(0, id.to_string());
        self.recent_templates.truncate(RECENT_LIMIT);
    }
}

/// State container for the editor, backed by a durable key-value store
pub struct TemplateStore {
    storage: Arc<dyn KeyValueStore>,
    state: StudioState,
}

impl TemplateStore {
    /// Hydrate from storage, falling back to defaults when nothing (or
    /// something unreadable) is stored.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> AppResult<Self> {
        let state = match storage.get(STUDIO_STATE_KEY)? {
            Some(raw) => match serde_json::from_str::<StudioState>(&raw) {
                Ok(state) => {
                    tracing::debug!(
                        templates = state.user_templates.len(),
                        presets = state.presets.len(),
                        "hydrated studio state"
                    );
                    state
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stored studio state is unreadable, starting fresh");
                    StudioState::default()
                }
            },
            None => StudioState::default(),
        };

        Ok(Self { storage, state })
    }

    pub fn state(&self) -> &StudioState {
        &self.state
    }

    pub fn document(&self) -> &PromptDocument {
        &self.state.prompt_data
    }

    pub fn wizard(&self) -> &Wizard {
        &self.state.wizard
    }

    pub fn user_templates(&self) -> &[UserTemplate] {
        &self.state.user_templates
    }

    pub fn recent_template_ids(&self) -> &[String] {
        &self.state.recent_templates
    }

    /// Persist `next` and make it current.
    fn commit(&mut self, next: StudioState) -> AppResult<()> {
        let raw = serde_json::to_string(&next)?;
        self.storage.set(STUDIO_STATE_KEY, &raw)?;
        self.state = next;
        Ok(())
    }

    /// Apply `f` to a copy of the state and commit it when `f` reports a change.
    fn mutate<F>(&mut self, f: F) -> AppResult<bool>
    where
        F: FnOnce(&mut StudioState) -> bool,
    {
        let mut next = self.state.clone();
        if !f(&mut next) {
            return Ok(false);
        }
        self.commit(next)?;
        Ok(true)
    }

    // ========================================================================
    // Document
    // ========================================================================

    /// Merge a partial update into the current document
    pub fn update_document(&mut self, patch: PromptDocumentPatch) -> AppResult<()> {
        self.mutate(|state| {
            state.prompt_data.apply_patch(patch);
            true
        })?;
        Ok(())
    }

    /// Restore the default document and return to the welcome screen
    pub fn reset_document(&mut self) -> AppResult<()> {
        self.mutate(|state| {
            state.prompt_data = PromptDocument::default();
            state.wizard.reset();
            true
        })?;
        Ok(())
    }

    /// The current document as pretty JSON (no envelope)
    pub fn export_json(&self) -> AppResult<String> {
        Ok(self.state.prompt_data.to_pretty_json()?)
    }

    /// Replace the document wholesale.
    ///
    /// Returns `Ok(false)` and leaves state unchanged when `text` is not a
    /// complete document.
    pub fn import_json(&mut self, text: &str) -> AppResult<bool> {
        let document = match PromptDocument::from_json(text) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(error = %e, "rejected document import");
                return Ok(false);
            }
        };
        self.mutate(|state| {
            state.prompt_data = document;
            true
        })
    }

    // ========================================================================
    // Templates
    // ========================================================================

    /// Snapshot the current document as a new user template
    pub fn save_as_template(&mut self, metadata: TemplateMetadata) -> AppResult<UserTemplate> {
        if metadata.name.trim().is_empty() || metadata.description.trim().is_empty() {
            return Err(AppError::validation("Template name and description are required"));
        }

        let template = UserTemplate {
            id: generate_id("custom"),
            name: metadata.name,
            description: metadata.description,
            category: metadata.category,
            tags: metadata.tags,
            data: self.state.prompt_data.clone(),
            created_at: now_iso(),
            is_favorite: false,
            usage_count: 0,
        };

        let saved = template.clone();
        self.mutate(|state| {
            state.user_templates.push(template);
            true
        })?;

        tracing::info!(template_id = %saved.id, name = %saved.name, "saved template");
        Ok(saved)
    }

    /// Remove a user template and its recency entry. Unknown ids are a no-op.
    pub fn delete_template(&mut self, id: &str) -> AppResult<bool> {
        let removed = self.mutate(|state| {
            let before = state.user_templates.len();
            state.user_templates.retain(|t| t.id != id);
            state.recent_templates.retain(|recent| recent != id);
            state.user_templates.len() != before
        })?;

        if removed {
            tracing::info!(template_id = %id, "deleted template");
        }
        Ok(removed)
    }

    /// Flip the favorite flag. Returns the new value, or `None` for unknown ids.
    pub fn toggle_favorite(&mut self, id: &str) -> AppResult<Option<bool>> {
        let mut flag = None;
        self.mutate(|state| match state.user_template_mut(id) {
            Some(template) => {
                template.is_favorite = !template.is_favorite;
                flag = Some(template.is_favorite);
                true
            }
            None => false,
        })?;
        Ok(flag)
    }

    /// Replace the document with a copy of the template's data.
    ///
    /// User templates also get their usage counter bumped and move to the
    /// front of the recency list. Unknown ids are a no-op.
    pub fn load_template(&mut self, id: &str) -> AppResult<bool> {
        self.mutate(|state| apply_template(state, id))
    }

    /// Load a template and jump to the first editing step, in that order.
    pub fn select_template(&mut self, id: &str) -> AppResult<bool> {
        self.mutate(|state| {
            if !apply_template(state, id) {
                return false;
            }
            state.wizard.jump_to(0);
            true
        })
    }

    /// Look up a user or built-in template
    pub fn find_template(&self, id: &str) -> Option<TemplateRef<'_>> {
        self.state
            .user_templates
            .iter()
            .find(|t| t.id == id)
            .map(TemplateRef::User)
            .or_else(|| find_builtin(id).map(TemplateRef::Builtin))
    }

    /// Export a user or built-in template as a `TemplateFile`
    pub fn export_template(&self, id: &str) -> AppResult<String> {
        let template = self
            .find_template(id)
            .ok_or_else(|| AppError::not_found(format!("Template not found: {}", id)))?;
        render_template_file(template.snapshot())
    }

    /// Parse, validate and sanitize a template file, adding it as a new user
    /// template.
    pub fn import_template(&mut self, content: &str) -> AppResult<UserTemplate> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| AppError::parse(e.to_string()))?;

        if let Err(violation) = validate_template_file(&value) {
            tracing::warn!(reason = %violation, "rejected template import");
            return Err(AppError::schema(violation.to_string()));
        }

        let file = TemplateFile::from_validated(&sanitize_tree(value))?;
        let metadata = file.metadata.unwrap_or_default();

        let template = UserTemplate {
            id: generate_id("imported"),
            name: non_empty_or(metadata.name, IMPORTED_NAME),
            description: non_empty_or(metadata.description, IMPORTED_DESCRIPTION),
            category: metadata.category,
            tags: metadata.tags,
            data: file.data,
            created_at: now_iso(),
            is_favorite: false,
            usage_count: 0,
        };

        let imported = template.clone();
        self.mutate(|state| {
            state.user_templates.push(template);
            true
        })?;

        tracing::info!(template_id = %imported.id, name = %imported.name, "imported template");
        Ok(imported)
    }

    /// Built-ins followed by user templates, narrowed by `filter`
    pub fn search_templates(&self, filter: &LibraryFilter) -> Vec<TemplateSummary> {
        builtin_templates()
            .iter()
            .map(TemplateRef::Builtin)
            .chain(self.state.user_templates.iter().map(TemplateRef::User))
            .map(|t| t.summary())
            .filter(|summary| filter.matches(summary))
            .collect()
    }

    /// The recency list resolved to summaries, skipping dangling ids
    pub fn recent_templates(&self) -> Vec<TemplateSummary> {
        self.state
            .recent_templates
            .iter()
            .filter_map(|id| self.find_template(id))
            .map(|t| t.summary())
            .collect()
    }

    // ========================================================================
    // Presets
    // ========================================================================

    /// Store a named copy of the current document, replacing any preset of
    /// the same name
    pub fn save_preset(&mut self, name: &str) -> AppResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Preset name is required"));
        }
        self.mutate(|state| {
            let document = state.prompt_data.clone();
            state.presets.insert(name.to_string(), document);
            true
        })?;
        Ok(())
    }

    /// Replace the document with a copy of a preset. Unknown names are a no-op.
    pub fn load_preset(&mut self, name: &str) -> AppResult<bool> {
        self.mutate(|state| match state.presets.get(name) {
            Some(preset) => {
                state.prompt_data = preset.clone();
                true
            }
            None => false,
        })
    }

    pub fn preset_names(&self) -> Vec<String> {
        self.state.presets.keys().cloned().collect()
    }

    // ========================================================================
    // Wizard
    // ========================================================================

    /// Run a wizard transition, persisting the new step when it changed
    pub fn navigate<F>(&mut self, transition: F) -> AppResult<bool>
    where
        F: FnOnce(&mut Wizard) -> bool,
    {
        self.mutate(|state| transition(&mut state.wizard))
    }
}

fn apply_template(state: &mut StudioState, id: &str) -> bool {
    if let Some(template) = state.user_template_mut(id) {
        template.usage_count = template.usage_count.saturating_add(1);
        let document = template.data.clone();
        state.prompt_data = document;
        state.touch_recent(id);
        return true;
    }
    match find_builtin(id) {
        Some(builtin) => {
            state.prompt_data = builtin.data.clone();
            true
        }
        None => false,
    }
}

/// Serialize any template into the pretty-printed `TemplateFile` envelope
pub fn render_template_file(template: &dyn TemplateSnapshot) -> AppResult<String> {
    let rendered = TemplateFile::wrap(template, now_iso()).to_pretty_json()?;
    tracing::debug!(template_id = %template.template_id(), "rendered template file");
    Ok(rendered)
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `<prefix>-<epoch-ms>-<random>`; the random suffix keeps ids unique within
/// the same millisecond.
fn generate_id(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        prefix,
        Utc::now().timestamp_millis(),
        &suffix[..8]
    )
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
