//! Prompt Studio Core
//!
//! Pure building blocks for the Prompt Studio workspace. This crate has zero
//! dependencies on application-level code (storage, configuration, CLI).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`, `SchemaViolation`)
//! - `document` - The prompt document model, defaults, partial merge and serialization
//! - `template` - Template categories, metadata and the exported `TemplateFile` envelope
//! - `validation` - Structural and safety validation of untrusted template files
//! - `sanitize` - Stripping of unsafe substrings from free text
//! - `wizard` - Step state machine for the multi-step editor
//!
//! ## Design Principles
//!
//! 1. **Zero I/O** - every function here is pure or operates on in-memory values
//! 2. **Always-complete documents** - a `PromptDocument` never has missing keys
//! 3. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod document;
pub mod error;
pub mod sanitize;
pub mod template;
pub mod validation;
pub mod wizard;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult, SchemaViolation};

// ── Document Model ─────────────────────────────────────────────────────
pub use document::{
    merge, DetailSet, DetailSetPatch, InstructionSet, InstructionSetPatch, LockSet, LockSetPatch,
    PromptDocument, PromptDocumentPatch,
};

// ── Templates ──────────────────────────────────────────────────────────
pub use template::{
    EnvelopeHeader, TemplateCategory, TemplateFile, TemplateMetadata, TemplateSnapshot,
    TEMPLATE_SIGNATURE, TEMPLATE_VERSION,
};

// ── Validation & Sanitization ──────────────────────────────────────────
pub use sanitize::{sanitize_text, sanitize_tree};
pub use validation::{is_valid_template_file, validate_template_file};

// ── Wizard ─────────────────────────────────────────────────────────────
pub use wizard::{Screen, Wizard, WizardStep};
