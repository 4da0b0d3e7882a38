//! Persistence Integration Tests
//!
//! State written through the SQLite store must survive a restart, and a
//! failed write must leave the in-memory state untouched.

use std::sync::Arc;

use prompt_studio::storage::{Database, KeyValueStore, STUDIO_STATE_KEY};
use prompt_studio::{AppError, AppResult, TemplateStore};
use prompt_studio_core::{PromptDocumentPatch, TemplateCategory, TemplateMetadata, WizardStep};

/// Reads succeed, writes always fail
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> AppResult<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> AppResult<()> {
        Err(AppError::database("disk full"))
    }

    fn remove(&self, _key: &str) -> AppResult<()> {
        Err(AppError::database("disk full"))
    }
}

fn metadata() -> TemplateMetadata {
    TemplateMetadata {
        name: "Warehouse".to_string(),
        description: "Industrial loft backdrop".to_string(),
        category: TemplateCategory::Commercial,
        tags: vec!["loft".to_string()],
    }
}

#[test]
fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.db");

    let saved = {
        let storage: Arc<dyn KeyValueStore> = Arc::new(Database::open(&path).unwrap());
        let mut store = TemplateStore::load(storage).unwrap();
        store.navigate(|w| w.start_creating()).unwrap();
        store.navigate(|w| w.next()).unwrap();
        store
            .update_document(PromptDocumentPatch {
                input_image: Some("Model in a trench coat".to_string()),
                ..Default::default()
            })
            .unwrap();
        store.save_preset("coat").unwrap();
        let saved = store.save_as_template(metadata()).unwrap();
        store.load_template(&saved.id).unwrap();
        saved
    };

    let storage: Arc<dyn KeyValueStore> = Arc::new(Database::open(&path).unwrap());
    let store = TemplateStore::load(storage).unwrap();

    assert_eq!(store.wizard().step(), WizardStep::Instructions);
    assert_eq!(store.document().input_image, "Model in a trench coat");
    assert_eq!(store.preset_names(), vec!["coat".to_string()]);
    assert_eq!(store.user_templates().len(), 1);
    assert_eq!(store.user_templates()[0].id, saved.id);
    assert_eq!(store.user_templates()[0].usage_count, 1);
    assert_eq!(store.recent_template_ids(), &[saved.id]);
}

#[test]
fn test_persisted_shape_uses_camel_case() {
    let storage = Arc::new(Database::new_in_memory().unwrap());
    let mut store = TemplateStore::load(storage.clone()).unwrap();
    store.navigate(|w| w.jump_to(3)).unwrap();
    store.save_as_template(metadata()).unwrap();

    let raw = storage.get(STUDIO_STATE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(value["currentStep"], 3);
    assert!(value["promptData"]["model_lock"].is_object());
    assert_eq!(value["userTemplates"][0]["usageCount"], 0);
    assert!(value["recentTemplates"].is_array());
    assert!(value["presets"].is_object());
}

#[test]
fn test_library_overlay_is_not_persisted() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(Database::new_in_memory().unwrap());
    {
        let mut store = TemplateStore::load(storage.clone()).unwrap();
        store.navigate(|w| w.jump_to(1)).unwrap();
        store.navigate(|w| w.open_library()).unwrap();
    }

    let store = TemplateStore::load(storage).unwrap();
    assert_eq!(store.wizard().step(), WizardStep::Instructions);
    assert!(!store.wizard().is_library_open());
}

#[test]
fn test_failed_write_leaves_state_unchanged() {
    let mut store = TemplateStore::load(Arc::new(ReadOnlyStore)).unwrap();
    let before = store.state().clone();

    assert!(store.save_as_template(metadata()).is_err());
    assert!(store
        .update_document(PromptDocumentPatch {
            task: Some("outpaint".to_string()),
            ..Default::default()
        })
        .is_err());
    assert!(store.load_template("fashion-editorial-1").is_err());
    assert!(store.navigate(|w| w.start_creating()).is_err());

    assert_eq!(store.state(), &before);
}

#[test]
fn test_noop_does_not_write() {
    let mut store = TemplateStore::load(Arc::new(ReadOnlyStore)).unwrap();
    assert!(!store.delete_template("missing").unwrap());
    assert!(!store.load_template("missing").unwrap());
    assert!(!store.navigate(|w| w.previous()).unwrap());
}
