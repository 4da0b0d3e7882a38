//! Data Models
//!
//! Serializable data structures shared by services and commands.

pub mod response;
pub mod settings;
pub mod template;

pub use response::*;
pub use settings::*;
pub use template::*;
