//! Prompt Document Model
//!
//! The structured configuration edited across the wizard steps and exported as
//! JSON for image/video generation tools. A `PromptDocument` is always fully
//! populated; edits arrive as patches whose `None` fields leave the current
//! value in place.
//!
//! Field names are snake_case on the wire because that is the shape
//! downstream generation tools consume.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Copy every `Some` field of a patch onto its target.
macro_rules! apply_fields {
    ($target:expr, $patch:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = value;
            }
        )+
    };
}

/// The document being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptDocument {
    pub fidelity_priority: String,
    pub task: String,
    pub input_image: String,
    pub background_description: String,
    pub instructions: InstructionSet,
    pub model_lock: LockSet,
    pub additional_details: DetailSet,
}

/// Preserve/lock toggles plus style and output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionSet {
    pub preserve_subject: bool,
    pub preserve_details: bool,
    pub pose_locked: bool,
    pub no_face_or_garment_modification: bool,
    pub scale_and_alignment: String,
    pub integration_style: String,
    pub lighting_match: bool,
    pub shadow_blending: bool,
    pub color_grading: String,
    pub output_resolution: String,
    pub logos: String,
    pub product_features: String,
}

/// Independent on/off constraints on the subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSet {
    pub preserve_proportions: bool,
    pub feet_position_locked: bool,
    pub head_position_locked: bool,
    pub arms_position_locked: bool,
    pub legs_position_locked: bool,
    pub outfit_position_locked: bool,
    pub no_body_warping: bool,
    pub no_pose_generation: bool,
    pub no_scale_distortion: bool,
    pub camera_perspective_locked: bool,
    pub preserve_skin_tone: bool,
    pub preserve_race: bool,
    pub preserve_face_identity: bool,
    pub preserve_subject_position: bool,
    pub preserve_frame_ratio: bool,
}

/// Free-text finishing notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailSet {
    pub visual_style: String,
    pub lighting: String,
    pub integration_priority: String,
}

/// Partial update to a `PromptDocument`.
///
/// Top-level fields replace wholesale; the three sections are merged one level
/// deep so a patch may touch a single key inside a section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PromptDocumentPatch {
    pub fidelity_priority: Option<String>,
    pub task: Option<String>,
    pub input_image: Option<String>,
    pub background_description: Option<String>,
    pub instructions: Option<InstructionSetPatch>,
    pub model_lock: Option<LockSetPatch>,
    pub additional_details: Option<DetailSetPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstructionSetPatch {
    pub preserve_subject: Option<bool>,
    pub preserve_details: Option<bool>,
    pub pose_locked: Option<bool>,
    pub no_face_or_garment_modification: Option<bool>,
    pub scale_and_alignment: Option<String>,
    pub integration_style: Option<String>,
    pub lighting_match: Option<bool>,
    pub shadow_blending: Option<bool>,
    pub color_grading: Option<String>,
    pub output_resolution: Option<String>,
    pub logos: Option<String>,
    pub product_features: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LockSetPatch {
    pub preserve_proportions: Option<bool>,
    pub feet_position_locked: Option<bool>,
    pub head_position_locked: Option<bool>,
    pub arms_position_locked: Option<bool>,
    pub legs_position_locked: Option<bool>,
    pub outfit_position_locked: Option<bool>,
    pub no_body_warping: Option<bool>,
    pub no_pose_generation: Option<bool>,
    pub no_scale_distortion: Option<bool>,
    pub camera_perspective_locked: Option<bool>,
    pub preserve_skin_tone: Option<bool>,
    pub preserve_race: Option<bool>,
    pub preserve_face_identity: Option<bool>,
    pub preserve_subject_position: Option<bool>,
    pub preserve_frame_ratio: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetailSetPatch {
    pub visual_style: Option<String>,
    pub lighting: Option<String>,
    pub integration_priority: Option<String>,
}

impl Default for PromptDocument {
    /// Baseline for a fresh session and the reset target.
    fn default() -> Self {
        Self {
            fidelity_priority: String::new(),
            task: "background_integration".to_string(),
            input_image: String::new(),
            background_description: String::new(),
            instructions: InstructionSet::default(),
            model_lock: LockSet::default(),
            additional_details: DetailSet::default(),
        }
    }
}

impl Default for InstructionSet {
    fn default() -> Self {
        Self {
            preserve_subject: true,
            preserve_details: true,
            pose_locked: true,
            no_face_or_garment_modification: true,
            scale_and_alignment: "match original proportions and placement".to_string(),
            integration_style: "photorealistic".to_string(),
            lighting_match: true,
            shadow_blending: true,
            color_grading: "match background".to_string(),
            output_resolution: "same_as_input".to_string(),
            logos: "Preserve original logo shape, size, and position".to_string(),
            product_features: "Preserve garment material, color, fit, silhouette, and texture. \
                               No hallucinations or alterations."
                .to_string(),
        }
    }
}

impl Default for LockSet {
    fn default() -> Self {
        Self {
            preserve_proportions: true,
            feet_position_locked: true,
            head_position_locked: true,
            arms_position_locked: true,
            legs_position_locked: true,
            outfit_position_locked: true,
            no_body_warping: true,
            no_pose_generation: true,
            no_scale_distortion: true,
            camera_perspective_locked: true,
            preserve_skin_tone: true,
            preserve_race: true,
            preserve_face_identity: true,
            preserve_subject_position: true,
            preserve_frame_ratio: true,
        }
    }
}

impl Default for DetailSet {
    fn default() -> Self {
        Self {
            visual_style: "Editorial, cinematic, with a focus on dynamic athletic posture".to_string(),
            lighting: "Natural midday with soft shadows blending seamlessly into background, \
                       capturing an energetic yet relaxed mood"
                .to_string(),
            integration_priority: "Scene realism must not override model or product accuracy"
                .to_string(),
        }
    }
}

impl PromptDocument {
    /// Apply a partial update in place.
    pub fn apply_patch(&mut self, patch: PromptDocumentPatch) {
        apply_fields!(self, patch; fidelity_priority, task, input_image, background_description);

        if let Some(instructions) = patch.instructions {
            apply_fields!(self.instructions, instructions;
                preserve_subject, preserve_details, pose_locked, no_face_or_garment_modification,
                scale_and_alignment, integration_style, lighting_match, shadow_blending,
                color_grading, output_resolution, logos, product_features,
            );
        }
        if let Some(model_lock) = patch.model_lock {
            apply_fields!(self.model_lock, model_lock;
                preserve_proportions, feet_position_locked, head_position_locked,
                arms_position_locked, legs_position_locked, outfit_position_locked,
                no_body_warping, no_pose_generation, no_scale_distortion,
                camera_perspective_locked, preserve_skin_tone, preserve_race,
                preserve_face_identity, preserve_subject_position, preserve_frame_ratio,
            );
        }
        if let Some(details) = patch.additional_details {
            apply_fields!(self.additional_details, details;
                visual_style, lighting, integration_priority,
            );
        }
    }

    /// Pretty-printed JSON with a two-space indent.
    pub fn to_pretty_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a complete document. Partial or malformed input is a parse error.
    pub fn from_json(text: &str) -> CoreResult<Self> {
        serde_json::from_str(text).map_err(|e| CoreError::parse(e.to_string()))
    }
}

/// Merge a patch into a copy of `current`.
pub fn merge(current: &PromptDocument, patch: PromptDocumentPatch) -> PromptDocument {
    let mut next = current.clone();
    next.apply_patch(patch);
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document() {
        let doc = PromptDocument::default();
        assert_eq!(doc.task, "background_integration");
        assert_eq!(doc.instructions.output_resolution, "same_as_input");
        assert!(doc.model_lock.preserve_face_identity);
        assert!(doc.fidelity_priority.is_empty());
    }

    #[test]
    fn test_merge_preserves_untouched_fields() {
        let doc = PromptDocument::default();
        let patch = PromptDocumentPatch {
            instructions: Some(InstructionSetPatch {
                preserve_subject: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };

        let merged = merge(&doc, patch);

        assert!(!merged.instructions.preserve_subject);
        let mut expected = doc.clone();
        expected.instructions.preserve_subject = false;
        assert_eq!(merged, expected);
        // The source document is untouched
        assert!(doc.instructions.preserve_subject);
    }

    #[test]
    fn test_merge_top_level_and_nested() {
        let doc = PromptDocument::default();
        let patch: PromptDocumentPatch = serde_json::from_str(
            r#"{"task": "relight", "model_lock": {"preserve_race": false},
                "additional_details": {"lighting": "Overcast"}}"#,
        )
        .unwrap();

        let merged = merge(&doc, patch);

        assert_eq!(merged.task, "relight");
        assert!(!merged.model_lock.preserve_race);
        assert!(merged.model_lock.preserve_skin_tone);
        assert_eq!(merged.additional_details.lighting, "Overcast");
        assert_eq!(merged.additional_details.visual_style, doc.additional_details.visual_style);
    }

    #[test]
    fn test_patch_rejects_unknown_keys() {
        let result: Result<PromptDocumentPatch, _> =
            serde_json::from_str(r#"{"instructions": {"preserve_subjekt": false}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_parse_round_trip() {
        let mut doc = PromptDocument::default();
        doc.input_image = "Model on a rooftop \"at dusk\"".to_string();
        doc.model_lock.no_pose_generation = false;

        let text = doc.to_pretty_json().unwrap();
        assert!(text.starts_with("{\n  \"fidelity_priority\""));
        assert_eq!(PromptDocument::from_json(&text).unwrap(), doc);
    }

    #[test]
    fn test_from_json_rejects_partial_document() {
        let err = PromptDocument::from_json(r#"{"task": "x"}"#).unwrap_err();
        assert!(matches!(err, CoreError::Parse(_)));

        let err = PromptDocument::from_json("not json").unwrap_err();
        assert!(matches!(err, CoreError::Parse(_)));
    }
}
