//! Template Library
//!
//! The template store (current document, user templates, presets, recency
//! list) and the built-in catalog it searches alongside user templates.

pub mod catalog;
pub mod store;

pub use catalog::{builtin_templates, find_builtin};
pub use store::{render_template_file, StudioState, TemplateStore, RECENT_LIMIT};
