//! Health Check Commands
//!
//! Commands for checking the health status of backend services.

use crate::models::response::{CommandResponse, HealthResponse};
use crate::state::AppState;

/// Get the health status of the storage backend and the gate
pub async fn get_health(state: &AppState) -> CommandResponse<HealthResponse> {
    let mut health = HealthResponse::default();

    health.storage = state.is_storage_healthy();
    health.authenticated = state
        .with_gate(|gate| gate.is_authenticated())
        .await
        .unwrap_or(false);

    health.status = if health.storage {
        "healthy".to_string()
    } else {
        "degraded".to_string()
    };

    CommandResponse::ok(health)
}
