//! Template Models
//!
//! Data structures for the template library: immutable built-ins shipped with
//! the app and user templates carrying favorite/usage bookkeeping.

use prompt_studio_core::{PromptDocument, TemplateCategory, TemplateMetadata, TemplateSnapshot};
use serde::{Deserialize, Serialize};

/// A template created locally by saving or importing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    pub tags: Vec<String>,
    pub data: PromptDocument,
    /// ISO-8601 creation timestamp
    pub created_at: String,
    pub is_favorite: bool,
    /// Incremented each time the template is loaded
    pub usage_count: u32,
}

/// A fixed template shipped with the application (cannot be deleted)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltinTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    pub tags: Vec<String>,
    pub author: String,
    pub created_at: String,
    pub data: PromptDocument,
}

impl TemplateSnapshot for UserTemplate {
    fn template_id(&self) -> &str {
        &self.id
    }

    fn metadata(&self) -> TemplateMetadata {
        TemplateMetadata {
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category,
            tags: self.tags.clone(),
        }
    }

    fn data(&self) -> &PromptDocument {
        &self.data
    }
}

impl TemplateSnapshot for BuiltinTemplate {
    fn template_id(&self) -> &str {
        &self.id
    }

    fn metadata(&self) -> TemplateMetadata {
        TemplateMetadata {
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category,
            tags: self.tags.clone(),
        }
    }

    fn data(&self) -> &PromptDocument {
        &self.data
    }
}

/// Either kind of library entry
#[derive(Debug, Clone, Copy)]
pub enum TemplateRef<'a> {
    Builtin(&'a BuiltinTemplate),
    User(&'a UserTemplate),
}

impl TemplateRef<'_> {
    pub fn snapshot(&self) -> &dyn TemplateSnapshot {
        match self {
            TemplateRef::Builtin(t) => *t,
            TemplateRef::User(t) => *t,
        }
    }

    pub fn summary(&self) -> TemplateSummary {
        match self {
            TemplateRef::Builtin(t) => TemplateSummary {
                id: t.id.clone(),
                name: t.name.clone(),
                description: t.description.clone(),
                category: t.category,
                tags: t.tags.clone(),
                builtin: true,
                is_favorite: false,
                usage_count: 0,
            },
            TemplateRef::User(t) => TemplateSummary {
                id: t.id.clone(),
                name: t.name.clone(),
                description: t.description.clone(),
                category: t.category,
                tags: t.tags.clone(),
                builtin: false,
                is_favorite: t.is_favorite,
                usage_count: t.usage_count,
            },
        }
    }
}

/// Lightweight row for library listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    pub tags: Vec<String>,
    pub builtin: bool,
    pub is_favorite: bool,
    pub usage_count: u32,
}

/// Library search filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryFilter {
    /// Case-insensitive match against name, description or any tag
    pub query: Option<String>,
    pub category: Option<TemplateCategory>,
    /// Only favorited user templates
    #[serde(default)]
    pub favorites_only: bool,
}

impl LibraryFilter {
    pub fn matches(&self, summary: &TemplateSummary) -> bool {
        if self.favorites_only && !summary.is_favorite {
            return false;
        }
        if let Some(category) = self.category {
            if summary.category != category {
                return false;
            }
        }
        match self.query.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => {
                let query = query.to_lowercase();
                summary.name.to_lowercase().contains(&query)
                    || summary.description.to_lowercase().contains(&query)
                    || summary
                        .tags
                        .iter()
                        .any(|tag| tag.to_lowercase().contains(&query))
            }
            _ => true,
        }
    }
}
