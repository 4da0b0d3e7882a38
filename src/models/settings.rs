//! Settings Models
//!
//! Application configuration and settings data structures.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application configuration stored in config.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Shared passcode checked by the access gate
    pub passcode: String,
    /// Consecutive failed attempts before the gate locks
    pub max_attempts: u32,
    /// How long the gate stays locked, in minutes
    pub lockout_minutes: u32,
    /// Database file override; defaults to ~/.prompt-studio/data.db
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            passcode: "blinkDEL19".to_string(),
            max_attempts: 5,
            lockout_minutes: 15,
            database_file: None,
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    pub passcode: Option<String>,
    pub max_attempts: Option<u32>,
    pub lockout_minutes: Option<u32>,
    pub database_file: Option<PathBuf>,
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: ConfigUpdate) {
        if let Some(passcode) = update.passcode {
            self.passcode = passcode;
        }
        if let Some(max) = update.max_attempts {
            self.max_attempts = max;
        }
        if let Some(minutes) = update.lockout_minutes {
            self.lockout_minutes = minutes;
        }
        if let Some(path) = update.database_file {
            self.database_file = Some(path);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.passcode.is_empty() {
            return Err("passcode must not be empty".to_string());
        }

        if self.max_attempts == 0 || self.max_attempts > 100 {
            return Err(format!(
                "max_attempts must be between 1 and 100, got {}",
                self.max_attempts
            ));
        }

        // At most one day
        if self.lockout_minutes == 0 || self.lockout_minutes > 1440 {
            return Err(format!(
                "lockout_minutes must be between 1 and 1440, got {}",
                self.lockout_minutes
            ));
        }

        Ok(())
    }
}
