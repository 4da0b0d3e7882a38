//! Commands
//!
//! Async entry points for the host (the CLI today). Every command takes the
//! shared `AppState` and returns a uniform `CommandResponse<T>`; everything
//! except the gate commands requires the gate to be passed.

pub mod auth;
pub mod document;
pub mod files;
pub mod health;
pub mod presets;
pub mod settings;
pub mod templates;
pub mod wizard;

pub use auth::*;
pub use document::*;
pub use health::*;
pub use presets::*;
pub use settings::*;
pub use templates::*;
pub use wizard::*;

use crate::models::response::CommandResponse;
use crate::services::templates::TemplateStore;
use crate::state::AppState;
use crate::utils::error::AppResult;

/// Read the store once the gate has been passed
pub(crate) async fn read_store<F, T>(state: &AppState, f: F) -> CommandResponse<T>
where
    F: FnOnce(&TemplateStore) -> AppResult<T>,
{
    let result = match state.require_authenticated().await {
        Ok(()) => state.with_store(f).await,
        Err(e) => Err(e),
    };
    result.into()
}

/// Mutate the store once the gate has been passed
pub(crate) async fn write_store<F, T>(state: &AppState, f: F) -> CommandResponse<T>
where
    F: FnOnce(&mut TemplateStore) -> AppResult<T>,
{
    let result = match state.require_authenticated().await {
        Ok(()) => state.with_store_mut(f).await,
        Err(e) => Err(e),
    };
    result.into()
}
