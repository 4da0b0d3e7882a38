//! Access Gate Commands

use crate::models::response::CommandResponse;
use crate::services::access_gate::{GateOutcome, GateStatus};
use crate::state::AppState;

/// Current gate status, clearing an expired lockout first
pub async fn get_gate_status(state: &AppState) -> CommandResponse<GateStatus> {
    state.with_gate(|gate| gate.status()).await.into()
}

/// Submit a passcode
pub async fn unlock(state: &AppState, code: &str) -> CommandResponse<GateOutcome> {
    state.with_gate(|gate| gate.submit(code)).await.into()
}

/// Forget the authenticated flag
pub async fn lock(state: &AppState) -> CommandResponse<()> {
    state.with_gate(|gate| gate.sign_out()).await.into()
}
