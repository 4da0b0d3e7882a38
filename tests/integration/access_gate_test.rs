//! Access Gate Integration Tests

use std::sync::Arc;

use chrono::{Duration, Utc};
use prompt_studio::models::settings::AppConfig;
use prompt_studio::storage::{Database, KeyValueStore};
use prompt_studio::{AccessGate, GateOutcome, GateStatus};

fn config() -> AppConfig {
    AppConfig {
        passcode: "Harbor-Lights".to_string(),
        max_attempts: 3,
        lockout_minutes: 10,
        database_file: None,
    }
}

#[test]
fn test_configured_limits_apply() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(Database::new_in_memory().unwrap());
    let gate = AccessGate::from_config(storage, &config());
    let now = Utc::now();

    assert_eq!(
        gate.submit_at("nope", now).unwrap(),
        GateOutcome::Denied {
            attempts_remaining: 2
        }
    );
    gate.submit_at("nope", now).unwrap();
    match gate.submit_at("nope", now).unwrap() {
        GateOutcome::LockedOut {
            remaining_seconds, ..
        } => assert_eq!(remaining_seconds, 600),
        other => panic!("expected lockout, got {:?}", other),
    }

    assert!(matches!(
        gate.submit_at("Harbor-Lights", now + Duration::minutes(9)).unwrap(),
        GateOutcome::LockedOut { .. }
    ));
    assert_eq!(
        gate.submit_at("Harbor-Lights", now + Duration::minutes(11)).unwrap(),
        GateOutcome::Granted
    );
}

#[test]
fn test_lockout_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.db");
    let now = Utc::now();

    {
        let storage: Arc<dyn KeyValueStore> = Arc::new(Database::open(&path).unwrap());
        let gate = AccessGate::from_config(storage, &config());
        for _ in 0..3 {
            gate.submit_at("nope", now).unwrap();
        }
    }

    let storage: Arc<dyn KeyValueStore> = Arc::new(Database::open(&path).unwrap());
    let gate = AccessGate::from_config(storage, &config());
    assert!(matches!(
        gate.status_at(now + Duration::minutes(1)).unwrap(),
        GateStatus::Locked { .. }
    ));
}

#[test]
fn test_authentication_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.db");

    {
        let storage: Arc<dyn KeyValueStore> = Arc::new(Database::open(&path).unwrap());
        let gate = AccessGate::from_config(storage, &config());
        assert_eq!(gate.submit("Harbor-Lights").unwrap(), GateOutcome::Granted);
    }

    let storage: Arc<dyn KeyValueStore> = Arc::new(Database::open(&path).unwrap());
    let gate = AccessGate::from_config(storage, &config());
    assert!(gate.is_authenticated().unwrap());
    gate.sign_out().unwrap();
    assert!(!gate.is_authenticated().unwrap());
}
