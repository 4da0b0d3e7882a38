//! Command Facade Integration Tests

use std::sync::Arc;

use prompt_studio::commands;
use prompt_studio::commands::settings;
use prompt_studio::models::settings::{AppConfig, ConfigUpdate};
use prompt_studio::storage::{ConfigService, KeyValueStore, MemoryStore};
use prompt_studio::{AppState, GateOutcome, LibraryFilter};
use prompt_studio_core::{PromptDocumentPatch, Screen, TemplateMetadata, WizardStep};

const PASSCODE: &str = "letmein";

async fn unlocked_state() -> AppState {
    let state = locked_state().await;
    let response = commands::unlock(&state, PASSCODE).await;
    assert_eq!(response.data, Some(GateOutcome::Granted));
    state
}

async fn locked_state() -> AppState {
    let state = AppState::new();
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let config = AppConfig {
        passcode: PASSCODE.to_string(),
        ..Default::default()
    };
    state.initialize(storage, &config).await.unwrap();
    state
}

#[tokio::test]
async fn test_commands_require_authentication() {
    let state = locked_state().await;

    let response = commands::get_document(&state).await;
    assert!(!response.success);
    assert!(response.error.unwrap().contains("passcode"));

    let response = commands::list_templates(&state, LibraryFilter::default()).await;
    assert!(!response.success);

    assert!(commands::get_gate_status(&state).await.success);
    assert!(commands::get_health(&state).await.success);
}

#[tokio::test]
async fn test_lock_revokes_access() {
    let state = unlocked_state().await;
    assert!(commands::get_document(&state).await.success);

    assert!(commands::lock(&state).await.success);
    assert!(!commands::get_document(&state).await.success);
}

#[tokio::test]
async fn test_wizard_flow() {
    let state = unlocked_state().await;

    let view = commands::start_creating(&state).await.data.unwrap();
    assert!(view.changed);
    assert_eq!(
        view.screen,
        Screen::Step {
            step: WizardStep::BasicInfo
        }
    );

    let view = commands::previous_step(&state).await.data.unwrap();
    assert!(!view.changed);

    commands::jump_to_step(&state, 4).await;
    let view = commands::next_step(&state).await.data.unwrap();
    assert!(!view.changed);

    let view = commands::open_library(&state).await.data.unwrap();
    assert_eq!(
        view.screen,
        Screen::TemplateLibrary {
            return_to: WizardStep::Export
        }
    );

    let view = commands::close_library(&state).await.data.unwrap();
    assert_eq!(
        view.screen,
        Screen::Step {
            step: WizardStep::Export
        }
    );
}

#[tokio::test]
async fn test_select_template_from_library() {
    let state = unlocked_state().await;
    commands::open_library(&state).await;

    let document = commands::select_template(&state, "product-commercial-1")
        .await
        .data
        .unwrap();
    assert_eq!(document.instructions.output_resolution, "1920x1080");
    assert_eq!(
        commands::get_screen(&state).await.data,
        Some(Screen::Step {
            step: WizardStep::BasicInfo
        })
    );

    let response = commands::select_template(&state, "missing").await;
    assert!(!response.success);
}

#[tokio::test]
async fn test_import_json_rejects_partial_document() {
    let state = unlocked_state().await;
    commands::update_document(
        &state,
        PromptDocumentPatch {
            task: Some("relight".to_string()),
            ..Default::default()
        },
    )
    .await;

    let response = commands::import_json(&state, r#"{"task": "other"}"#).await;
    assert!(!response.success);
    assert_eq!(
        response.error.as_deref(),
        Some("Invalid JSON file. Please check the file format.")
    );

    let document = commands::get_document(&state).await.data.unwrap();
    assert_eq!(document.task, "relight");
}

#[tokio::test]
async fn test_template_file_exchange() {
    let state = unlocked_state().await;
    let dir = tempfile::tempdir().unwrap();

    let saved = commands::save_as_template(
        &state,
        TemplateMetadata {
            name: "Rooftop Golden Hour".to_string(),
            description: "City skyline at sunset".to_string(),
            ..Default::default()
        },
    )
    .await
    .data
    .unwrap();

    let path = commands::export_template_file(&state, &saved.id, dir.path())
        .await
        .data
        .unwrap();
    assert!(path.ends_with("rooftop-golden-hour.promptstudio"));

    let imported = commands::import_template_file(&state, &path)
        .await
        .data
        .unwrap();
    assert_eq!(imported.data, saved.data);

    let wrong = dir.path().join("notes.txt");
    std::fs::write(&wrong, "{}").unwrap();
    assert!(!commands::import_template_file(&state, &wrong).await.success);

    let all = commands::list_templates(&state, LibraryFilter::default())
        .await
        .data
        .unwrap();
    assert_eq!(all.len(), 6);
}

#[tokio::test]
async fn test_document_file_export() {
    let state = unlocked_state().await;
    let dir = tempfile::tempdir().unwrap();

    let path = commands::export_json_file(&state, dir.path())
        .await
        .data
        .unwrap();
    let name = path.file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("prompt-") && name.ends_with(".json"));

    let document = commands::import_json_file(&state, &path).await.data.unwrap();
    assert_eq!(document.task, "background_integration");
}

#[tokio::test]
async fn test_presets_and_favorites() {
    let state = unlocked_state().await;

    let names = commands::save_preset(&state, "default look").await.data.unwrap();
    assert_eq!(names, vec!["default look".to_string()]);
    assert!(commands::load_preset(&state, "default look").await.success);
    assert!(!commands::load_preset(&state, "nope").await.success);

    let saved = commands::save_as_template(
        &state,
        TemplateMetadata {
            name: "Fav".to_string(),
            description: "Favorite me".to_string(),
            ..Default::default()
        },
    )
    .await
    .data
    .unwrap();
    assert_eq!(
        commands::toggle_favorite(&state, &saved.id).await.data,
        Some(true)
    );
    assert!(!commands::toggle_favorite(&state, "nope").await.success);

    assert_eq!(commands::delete_template(&state, &saved.id).await.data, Some(true));
    assert_eq!(commands::delete_template(&state, &saved.id).await.data, Some(false));
}

#[tokio::test]
async fn test_settings_hide_passcode() {
    let state = unlocked_state().await;
    let dir = tempfile::tempdir().unwrap();
    let mut service = ConfigService::open(dir.path().join("config.json")).unwrap();

    let view = settings::get_settings(&state, &mut service).await.data.unwrap();
    assert!(view.passcode_set);
    let json = serde_json::to_string(&view).unwrap();
    assert!(!json.contains("blinkDEL19"));

    let update = ConfigUpdate {
        lockout_minutes: Some(30),
        ..Default::default()
    };
    let view = settings::update_settings(&state, &mut service, update)
        .await
        .data
        .unwrap();
    assert_eq!(view.lockout_minutes, 30);

    let view = settings::reset_settings(&state, &mut service).await.data.unwrap();
    assert_eq!(view.lockout_minutes, 15);
}
