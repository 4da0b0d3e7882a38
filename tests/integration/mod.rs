//! Integration Tests Module
//!
//! End-to-end tests for Prompt Studio: template exchange through the
//! TemplateFile envelope, persistence across restarts, the access gate, and
//! the command facade.

// Template export/import round trips and rejection paths
mod template_exchange_test;

// Hydration and durability against the SQLite store
mod persistence_test;

// Access gate lockout behavior
mod access_gate_test;

// Command facade and gating
mod commands_test;
