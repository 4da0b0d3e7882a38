//! Template Exchange Integration Tests
//!
//! Export a template, import it back, and make sure hostile or malformed
//! files never reach the library.

use std::sync::Arc;

use prompt_studio::storage::MemoryStore;
use prompt_studio::{AppError, TemplateStore};
use prompt_studio_core::{
    merge, sanitize_text, InstructionSetPatch, PromptDocument, PromptDocumentPatch,
    TemplateCategory, TemplateMetadata, TEMPLATE_SIGNATURE,
};
use serde_json::Value;

fn store() -> TemplateStore {
    TemplateStore::load(Arc::new(MemoryStore::new())).unwrap()
}

fn exported_value(store: &TemplateStore, id: &str) -> Value {
    serde_json::from_str(&store.export_template(id).unwrap()).unwrap()
}

// ============================================================================
// Round Trips
// ============================================================================

#[test]
fn test_document_json_round_trip() {
    let mut document = PromptDocument::default();
    document.background_description = "Marble lobby, late afternoon sun".to_string();
    document.model_lock.feet_position_locked = false;

    let parsed = PromptDocument::from_json(&document.to_pretty_json().unwrap()).unwrap();
    assert_eq!(parsed, document);
}

#[test]
fn test_user_template_round_trip() {
    let mut store = store();
    store
        .update_document(PromptDocumentPatch {
            task: Some("virtual_try_on".to_string()),
            instructions: Some(InstructionSetPatch {
                logos: Some("keep chest logo sharp".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        })
        .unwrap();
    let original = store
        .save_as_template(TemplateMetadata {
            name: "Try-on".to_string(),
            description: "Garment swap on a locked pose".to_string(),
            category: TemplateCategory::Fashion,
            tags: vec!["apparel".to_string()],
        })
        .unwrap();

    let exported = store.export_template(&original.id).unwrap();
    let imported = store.import_template(&exported).unwrap();

    assert_ne!(imported.id, original.id);
    assert_eq!(imported.data, original.data);
    assert_eq!(imported.name, original.name);
    assert_eq!(imported.description, original.description);
    assert_eq!(imported.category, original.category);
    assert_eq!(imported.tags, original.tags);
}

#[test]
fn test_builtin_template_round_trip() {
    let mut store = store();
    let exported = store.export_template("fashion-editorial-1").unwrap();
    let imported = store.import_template(&exported).unwrap();

    assert_eq!(imported.name, "Fashion Editorial Studio");
    assert_eq!(imported.category, TemplateCategory::Fashion);
    assert_eq!(store.user_templates().len(), 1);
}

#[test]
fn test_export_envelope_shape() {
    let store = store();
    let value = exported_value(&store, "product-commercial-1");

    assert_eq!(value["_promptStudio"]["signature"], TEMPLATE_SIGNATURE);
    assert_eq!(value["_promptStudio"]["version"], "1.0");
    assert!(value["_promptStudio"]["exported"].is_string());
    assert_eq!(value["metadata"]["category"], "product");
    assert_eq!(value["data"]["instructions"]["output_resolution"], "1920x1080");
}

#[test]
fn test_export_unknown_template() {
    let store = store();
    assert!(matches!(
        store.export_template("missing"),
        Err(AppError::NotFound(_))
    ));
}

// ============================================================================
// Rejections
// ============================================================================

#[test]
fn test_wrong_signature_is_rejected() {
    let mut store = store();
    let mut value = exported_value(&store, "lifestyle-outdoor-1");
    value["_promptStudio"]["signature"] = Value::String("some-other-app".to_string());

    let err = store.import_template(&value.to_string()).unwrap_err();
    assert!(matches!(err, AppError::Schema(_)));
    assert!(store.user_templates().is_empty());
}

#[test]
fn test_oversized_file_is_rejected() {
    let mut store = store();
    let mut value = exported_value(&store, "lifestyle-outdoor-1");
    value["padding"] = Value::String("x".repeat(100_001));

    let err = store.import_template(&value.to_string()).unwrap_err();
    assert!(matches!(err, AppError::Schema(_)));
}

#[test]
fn test_script_payload_is_rejected() {
    let mut store = store();
    let mut value = exported_value(&store, "portrait-professional-1");
    value["data"]["background_description"] =
        Value::String("<script>alert(1)</script>".to_string());

    let err = store.import_template(&value.to_string()).unwrap_err();
    assert!(matches!(err, AppError::Schema(_)));
    assert_eq!(
        err.user_message(),
        "Invalid template file. Please use files exported from Prompt Studio."
    );
}

#[test]
fn test_corrupt_json_is_a_parse_error() {
    let mut store = store();
    let err = store.import_template("{\"_promptStudio\": ").unwrap_err();
    assert!(matches!(err, AppError::Parse(_)));
    assert_eq!(
        err.user_message(),
        "Invalid JSON file. Please check the file format."
    );
}

// ============================================================================
// Document Model
// ============================================================================

#[test]
fn test_merge_preserves_other_fields() {
    let current = PromptDocument::default();
    let merged = merge(
        &current,
        PromptDocumentPatch {
            instructions: Some(InstructionSetPatch {
                preserve_subject: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        },
    );

    let mut expected = current.clone();
    expected.instructions.preserve_subject = false;
    assert_eq!(merged, expected);
}

#[test]
fn test_sanitize_strips_markup() {
    let cleaned = sanitize_text("<script>alert(1)</script>hello");
    assert!(!cleaned.contains('<'));
    assert!(!cleaned.contains('>'));
    assert!(cleaned.contains("hello"));
}
