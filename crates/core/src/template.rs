//! Template Types
//!
//! Categories, descriptive metadata and the `TemplateFile` envelope that is the
//! only externally persisted template format. The envelope must round-trip
//! losslessly through export and import.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::PromptDocument;
use crate::error::{CoreError, CoreResult, SchemaViolation};

/// Soft authenticity marker carried by every exported template.
pub const TEMPLATE_SIGNATURE: &str = "prompt-studio-template";

/// Envelope version written on export.
pub const TEMPLATE_VERSION: &str = "1.0";

/// File extensions accepted on import.
pub const TEMPLATE_EXTENSIONS: [&str; 2] = ["json", "promptstudio"];

/// Template category (closed set)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Fashion,
    Product,
    Portrait,
    Lifestyle,
    Commercial,
    Editorial,
    #[default]
    Custom,
}

impl TemplateCategory {
    pub const ALL: [TemplateCategory; 7] = [
        TemplateCategory::Fashion,
        TemplateCategory::Product,
        TemplateCategory::Portrait,
        TemplateCategory::Lifestyle,
        TemplateCategory::Commercial,
        TemplateCategory::Editorial,
        TemplateCategory::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateCategory::Fashion => "fashion",
            TemplateCategory::Product => "product",
            TemplateCategory::Portrait => "portrait",
            TemplateCategory::Lifestyle => "lifestyle",
            TemplateCategory::Commercial => "commercial",
            TemplateCategory::Editorial => "editorial",
            TemplateCategory::Custom => "custom",
        }
    }

    /// Unknown category names from imported files fall back to `Custom`.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == wanted)
            .ok_or_else(|| CoreError::validation(format!("Unknown template category: {}", s)))
    }
}

/// Descriptive metadata shared by built-in and user templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMetadata {
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    pub tags: Vec<String>,
}

impl TemplateMetadata {
    /// Read metadata from an untrusted value, keeping whatever is well-formed.
    ///
    /// Non-string names, unknown categories and non-string tags are dropped
    /// rather than failing the whole import.
    pub fn from_value_lenient(value: &Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let category = value
            .get("category")
            .and_then(Value::as_str)
            .map(TemplateCategory::parse_lenient)
            .unwrap_or_default();
        let tags = value
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name: text("name"),
            description: text("description"),
            category,
            tags,
        }
    }
}

/// Anything that can be exported as a template file.
pub trait TemplateSnapshot {
    fn template_id(&self) -> &str;
    fn metadata(&self) -> TemplateMetadata;
    fn data(&self) -> &PromptDocument;
}

/// `_promptStudio` header of the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeHeader {
    pub version: String,
    pub exported: String,
    pub signature: String,
}

/// The external serialized form of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateFile {
    #[serde(rename = "_promptStudio")]
    pub header: EnvelopeHeader,
    pub data: PromptDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TemplateMetadata>,
}

impl TemplateFile {
    /// Wrap a template for export, stamped with `exported` (ISO-8601).
    pub fn wrap(template: &(impl TemplateSnapshot + ?Sized), exported: impl Into<String>) -> Self {
        Self {
            header: EnvelopeHeader {
                version: TEMPLATE_VERSION.to_string(),
                exported: exported.into(),
                signature: TEMPLATE_SIGNATURE.to_string(),
            },
            data: template.data().clone(),
            metadata: Some(template.metadata()),
        }
    }

    /// Build a typed envelope from a value that already passed validation.
    pub fn from_validated(value: &Value) -> CoreResult<Self> {
        let header: EnvelopeHeader = value
            .get("_promptStudio")
            .map(|h| EnvelopeHeader {
                version: str_field(h, "version"),
                exported: str_field(h, "exported"),
                signature: str_field(h, "signature"),
            })
            .ok_or(SchemaViolation::BadSignature)?;
        let data = value.get("data").ok_or(SchemaViolation::MissingData)?;
        let data: PromptDocument = serde_json::from_value(data.clone())
            .map_err(|_| SchemaViolation::InvalidField("data".to_string()))?;
        let metadata = value
            .get("metadata")
            .filter(|m| m.is_object())
            .map(TemplateMetadata::from_value_lenient);

        Ok(Self {
            header,
            data,
            metadata,
        })
    }

    pub fn to_pretty_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Suggested download name for an exported template.
pub fn export_file_name(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    let slug = if slug.is_empty() { "template" } else { slug };
    format!("{}.{}", slug, TEMPLATE_EXTENSIONS[1])
}

/// Whether a file name carries an extension accepted on import.
pub fn has_template_extension(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| {
            TEMPLATE_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        data: PromptDocument,
    }

    impl TemplateSnapshot for Fixture {
        fn template_id(&self) -> &str {
            "fixture"
        }

        fn metadata(&self) -> TemplateMetadata {
            TemplateMetadata {
                name: "Studio".to_string(),
                description: "White cyclorama".to_string(),
                category: TemplateCategory::Editorial,
                tags: vec!["studio".to_string()],
            }
        }

        fn data(&self) -> &PromptDocument {
            &self.data
        }
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Fashion".parse::<TemplateCategory>().unwrap(), TemplateCategory::Fashion);
        assert!("landscape".parse::<TemplateCategory>().is_err());
        assert_eq!(TemplateCategory::parse_lenient("landscape"), TemplateCategory::Custom);
    }

    #[test]
    fn test_wrap_writes_envelope() {
        let fixture = Fixture {
            data: PromptDocument::default(),
        };
        let file = TemplateFile::wrap(&fixture, "2025-01-01T00:00:00Z");
        let value = serde_json::to_value(&file).unwrap();

        assert_eq!(value["_promptStudio"]["signature"], TEMPLATE_SIGNATURE);
        assert_eq!(value["_promptStudio"]["version"], "1.0");
        assert_eq!(value["metadata"]["category"], "editorial");
        assert_eq!(value["data"]["task"], "background_integration");
    }

    #[test]
    fn test_from_validated_round_trip() {
        let fixture = Fixture {
            data: PromptDocument::default(),
        };
        let file = TemplateFile::wrap(&fixture, "2025-01-01T00:00:00Z");
        let value = serde_json::to_value(&file).unwrap();

        assert_eq!(TemplateFile::from_validated(&value).unwrap(), file);
    }

    #[test]
    fn test_lenient_metadata() {
        let value = serde_json::json!({
            "name": "Beach",
            "category": "seascape",
            "tags": ["sand", 42, "sun"]
        });
        let metadata = TemplateMetadata::from_value_lenient(&value);
        assert_eq!(metadata.name, "Beach");
        assert_eq!(metadata.description, "");
        assert_eq!(metadata.category, TemplateCategory::Custom);
        assert_eq!(metadata.tags, vec!["sand", "sun"]);
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("Fashion Editorial Studio"), "fashion-editorial-studio.promptstudio");
        assert_eq!(export_file_name("  !!  "), "template.promptstudio");
    }

    #[test]
    fn test_template_extensions() {
        assert!(has_template_extension("look.promptstudio"));
        assert!(has_template_extension("LOOK.JSON"));
        assert!(!has_template_extension("look.txt"));
        assert!(!has_template_extension("promptstudio"));
    }
}
