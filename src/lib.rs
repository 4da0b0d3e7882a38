//! Prompt Studio - Rust Backend Library
//!
//! Backend for the Prompt Studio guided editor. It includes:
//! - Async command handlers returning uniform `CommandResponse` envelopes
//! - The template store and access gate services
//! - Storage layer (SQLite key-value store, JSON config)
//! - Data models and utilities
//!
//! Pure document, template, validation and wizard logic lives in
//! `prompt-studio-core`.

pub mod commands;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use models::response::*;
pub use models::settings::{AppConfig, ConfigUpdate};
pub use models::template::{LibraryFilter, TemplateSummary, UserTemplate};
pub use services::{AccessGate, GateOutcome, GateStatus, TemplateStore};
pub use state::AppState;
pub use utils::error::{AppError, AppResult};
