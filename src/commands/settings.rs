//! Settings Commands
//!
//! Reading and updating `config.json`. Changes to the gate settings take
//! effect the next time the application starts.

use std::path::PathBuf;

use serde::Serialize;

use crate::models::response::CommandResponse;
use crate::models::settings::{AppConfig, ConfigUpdate};
use crate::state::AppState;
use crate::storage::config::ConfigService;
use crate::utils::error::AppResult;

/// Configuration as shown to the user; the passcode is never echoed back
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub path: PathBuf,
    pub passcode_set: bool,
    pub max_attempts: u32,
    pub lockout_minutes: u32,
    pub database_file: Option<PathBuf>,
}

impl SettingsView {
    fn new(service: &ConfigService, config: &AppConfig) -> Self {
        Self {
            path: service.path().to_path_buf(),
            passcode_set: !config.passcode.is_empty(),
            max_attempts: config.max_attempts,
            lockout_minutes: config.lockout_minutes,
            database_file: config.database_file.clone(),
        }
    }
}

async fn authorized<F>(
    state: &AppState,
    service: &mut ConfigService,
    f: F,
) -> CommandResponse<SettingsView>
where
    F: FnOnce(&mut ConfigService) -> AppResult<()>,
{
    let result: AppResult<SettingsView> = async {
        state.require_authenticated().await?;
        f(service)?;
        Ok(SettingsView::new(service, service.get_config()))
    }
    .await;
    result.into()
}

pub async fn get_settings(
    state: &AppState,
    service: &mut ConfigService,
) -> CommandResponse<SettingsView> {
    authorized(state, service, |_| Ok(())).await
}

/// Apply a partial update; invalid values leave the file untouched
pub async fn update_settings(
    state: &AppState,
    service: &mut ConfigService,
    update: ConfigUpdate,
) -> CommandResponse<SettingsView> {
    authorized(state, service, |service| service.update_config(update).map(|_| ())).await
}

pub async fn reset_settings(
    state: &AppState,
    service: &mut ConfigService,
) -> CommandResponse<SettingsView> {
    authorized(state, service, ConfigService::reset).await
}
