//! Services
//!
//! Business logic services for the application.
//! Services handle the core functionality and are called by commands.

pub mod access_gate;
pub mod templates;

pub use access_gate::{AccessGate, GateOutcome, GateStatus, LockoutRecord};
pub use templates::{builtin_templates, find_builtin, StudioState, TemplateStore};
