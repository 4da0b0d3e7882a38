//! Storage Layer
//!
//! Handles all data persistence: the durable key-value store (SQLite or
//! in-memory) and the JSON config file.

pub mod config;
pub mod database;
pub mod kv;

pub use config::*;
pub use database::*;
pub use kv::*;
