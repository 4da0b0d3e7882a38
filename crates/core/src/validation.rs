//! Template File Validation
//!
//! Structural and safety checks applied to untrusted template files before
//! anything is imported. All checks are pure; nothing here mutates state.
//!
//! Nested sections are validated strictly: every required key must be present
//! with the right JSON type. Extra keys are tolerated so files written by a
//! newer version still import.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::SchemaViolation;
use crate::template::TEMPLATE_SIGNATURE;

/// Maximum serialized size of a candidate file, in bytes.
pub const MAX_TEMPLATE_BYTES: usize = 100_000;

/// Maximum length of any free-text field, in characters.
pub const MAX_FIELD_CHARS: usize = 5_000;

#[derive(Clone, Copy)]
enum FieldKind {
    Text,
    Flag,
}

const ROOT_TEXT_FIELDS: [&str; 4] = [
    "fidelity_priority",
    "task",
    "input_image",
    "background_description",
];

const INSTRUCTION_FIELDS: [(&str, FieldKind); 12] = [
    ("preserve_subject", FieldKind::Flag),
    ("preserve_details", FieldKind::Flag),
    ("pose_locked", FieldKind::Flag),
    ("no_face_or_garment_modification", FieldKind::Flag),
    ("scale_and_alignment", FieldKind::Text),
    ("integration_style", FieldKind::Text),
    ("lighting_match", FieldKind::Flag),
    ("shadow_blending", FieldKind::Flag),
    ("color_grading", FieldKind::Text),
    ("output_resolution", FieldKind::Text),
    ("logos", FieldKind::Text),
    ("product_features", FieldKind::Text),
];

const LOCK_FIELDS: [&str; 15] = [
    "preserve_proportions",
    "feet_position_locked",
    "head_position_locked",
    "arms_position_locked",
    "legs_position_locked",
    "outfit_position_locked",
    "no_body_warping",
    "no_pose_generation",
    "no_scale_distortion",
    "camera_perspective_locked",
    "preserve_skin_tone",
    "preserve_race",
    "preserve_face_identity",
    "preserve_subject_position",
    "preserve_frame_ratio",
];

const DETAIL_FIELDS: [&str; 3] = ["visual_style", "lighting", "integration_priority"];

/// Blocked content pattern with a short label for diagnostics.
struct BlockedPattern {
    label: &'static str,
    regex: Regex,
}

/// Compiled blocklist (initialized once).
fn blocked_patterns() -> &'static [BlockedPattern] {
    static PATTERNS: OnceLock<Vec<BlockedPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            ("script tag", r"(?i)<script"),
            ("javascript URI", r"(?i)javascript:"),
            ("event handler", r"(?i)on\w+="),
            ("eval call", r"(?i)eval\("),
            ("function literal", r"(?i)function\("),
        ]
        .into_iter()
        .filter_map(|(label, pattern)| {
            Regex::new(pattern)
                .ok()
                .map(|regex| BlockedPattern { label, regex })
        })
        .collect()
    })
}

/// Whether `candidate` is an acceptable template file.
pub fn is_valid_template_file(candidate: &Value) -> bool {
    validate_template_file(candidate).is_ok()
}

/// Validate a candidate template file, reporting the first violation found.
pub fn validate_template_file(candidate: &Value) -> Result<(), SchemaViolation> {
    let serialized = candidate.to_string();
    if serialized.len() > MAX_TEMPLATE_BYTES {
        return Err(SchemaViolation::Oversized {
            size: serialized.len(),
            limit: MAX_TEMPLATE_BYTES,
        });
    }

    let header = candidate.get("_promptStudio");
    let signature = header.and_then(|h| h.get("signature")).and_then(Value::as_str);
    if signature != Some(TEMPLATE_SIGNATURE) {
        return Err(SchemaViolation::BadSignature);
    }
    if !header
        .and_then(|h| h.get("version"))
        .is_some_and(Value::is_string)
    {
        return Err(SchemaViolation::MissingVersion);
    }

    let data = candidate
        .get("data")
        .and_then(Value::as_object)
        .ok_or(SchemaViolation::MissingData)?;

    for field in ROOT_TEXT_FIELDS {
        check_field(data, "data", field, FieldKind::Text)?;
    }

    let instructions = section(data, "instructions")?;
    for (field, kind) in INSTRUCTION_FIELDS {
        check_field(instructions, "data.instructions", field, kind)?;
    }
    let model_lock = section(data, "model_lock")?;
    for field in LOCK_FIELDS {
        check_field(model_lock, "data.model_lock", field, FieldKind::Flag)?;
    }
    let details = section(data, "additional_details")?;
    for field in DETAIL_FIELDS {
        check_field(details, "data.additional_details", field, FieldKind::Text)?;
    }

    if let Some(hit) = blocked_patterns()
        .iter()
        .find(|p| p.regex.is_match(&serialized))
    {
        return Err(SchemaViolation::BlockedContent(hit.label));
    }

    Ok(())
}

fn section<'a>(
    data: &'a Map<String, Value>,
    name: &str,
) -> Result<&'a Map<String, Value>, SchemaViolation> {
    data.get(name)
        .and_then(Value::as_object)
        .ok_or_else(|| SchemaViolation::MissingSection(name.to_string()))
}

fn check_field(
    object: &Map<String, Value>,
    path: &str,
    field: &str,
    kind: FieldKind,
) -> Result<(), SchemaViolation> {
    let qualified = || format!("{}.{}", path, field);
    match (kind, object.get(field)) {
        (FieldKind::Flag, Some(Value::Bool(_))) => Ok(()),
        (FieldKind::Text, Some(Value::String(text))) => {
            if text.chars().count() > MAX_FIELD_CHARS {
                Err(SchemaViolation::FieldTooLong {
                    field: qualified(),
                    limit: MAX_FIELD_CHARS,
                })
            } else {
                Ok(())
            }
        }
        _ => Err(SchemaViolation::InvalidField(qualified())),
    }
}
