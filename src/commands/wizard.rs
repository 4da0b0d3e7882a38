//! Wizard Commands
//!
//! Each navigation command returns the screen to show afterwards; a
//! transition that does not apply leaves the screen unchanged.

use prompt_studio_core::{Screen, Wizard};
use serde::Serialize;

use super::{read_store, write_store};
use crate::models::response::CommandResponse;
use crate::state::AppState;

/// Result of a navigation command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub screen: Screen,
    /// Whether the transition applied
    pub changed: bool,
}

async fn navigate<F>(state: &AppState, transition: F) -> CommandResponse<WizardView>
where
    F: FnOnce(&mut Wizard) -> bool,
{
    write_store(state, |store| {
        let changed = store.navigate(transition)?;
        Ok(WizardView {
            screen: store.wizard().screen(),
            changed,
        })
    })
    .await
}

pub async fn get_screen(state: &AppState) -> CommandResponse<Screen> {
    read_store(state, |store| Ok(store.wizard().screen())).await
}

pub async fn start_creating(state: &AppState) -> CommandResponse<WizardView> {
    navigate(state, Wizard::start_creating).await
}

pub async fn next_step(state: &AppState) -> CommandResponse<WizardView> {
    navigate(state, Wizard::next).await
}

pub async fn previous_step(state: &AppState) -> CommandResponse<WizardView> {
    navigate(state, Wizard::previous).await
}

pub async fn jump_to_step(state: &AppState, index: i32) -> CommandResponse<WizardView> {
    navigate(state, |wizard| wizard.jump_to(index)).await
}

pub async fn open_library(state: &AppState) -> CommandResponse<WizardView> {
    navigate(state, Wizard::open_library).await
}

pub async fn close_library(state: &AppState) -> CommandResponse<WizardView> {
    navigate(state, Wizard::close_library).await
}
