//! Built-in Template Catalog
//!
//! Immutable templates shipped with the application. They can be loaded,
//! exported and saved as presets but never deleted or favorited.

use std::sync::OnceLock;

use crate::models::template::BuiltinTemplate;

const BUILTIN_TEMPLATES_JSON: &str = include_str!("builtin_templates.json");

/// All built-in templates (parsed once).
pub fn builtin_templates() -> &'static [BuiltinTemplate] {
    static BUILTINS: OnceLock<Vec<BuiltinTemplate>> = OnceLock::new();
    BUILTINS.get_or_init(|| match serde_json::from_str(BUILTIN_TEMPLATES_JSON) {
        Ok(templates) => templates,
        Err(e) => {
            tracing::error!(error = %e, "built-in template catalog is malformed");
            Vec::new()
        }
    })
}

/// Look up a built-in template by id.
pub fn find_builtin(id: &str) -> Option<&'static BuiltinTemplate> {
    builtin_templates().iter().find(|t| t.id == id)
}
