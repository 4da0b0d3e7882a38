//! Access Gate
//!
//! A passcode screen with an attempt-counted lockout. The secret and the
//! check both live in state the user can reach, so this is a deterrent and
//! not an authentication system.

use std::sync::Arc;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::settings::AppConfig;
use crate::storage::kv::{KeyValueStore, AUTH_FLAG_KEY, LOCKOUT_KEY};
use crate::utils::error::AppResult;

/// Persisted attempt counter and lockout expiry (`auth-lockout`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LockoutRecord {
    /// Epoch milliseconds; `None` while not locked
    pub end_time: Option<i64>,
    pub attempt_count: u32,
}

impl LockoutRecord {
    fn locked_until(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.end_time
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .filter(|end| *end > now)
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.end_time.is_some() && self.locked_until(now).is_none()
    }
}

/// Current state of the gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum GateStatus {
    Authenticated,
    #[serde(rename_all = "camelCase")]
    Open { attempts_remaining: u32 },
    #[serde(rename_all = "camelCase")]
    Locked { until: String, remaining_seconds: i64 },
}

/// Result of a passcode submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum GateOutcome {
    Granted,
    #[serde(rename_all = "camelCase")]
    Denied { attempts_remaining: u32 },
    #[serde(rename_all = "camelCase")]
    LockedOut { until: String, remaining_seconds: i64 },
}

/// Passcode gate backed by the shared key-value store
pub struct AccessGate {
    storage: Arc<dyn KeyValueStore>,
    secret: String,
    max_attempts: u32,
    lockout: Duration,
}

impl AccessGate {
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        secret: impl Into<String>,
        max_attempts: u32,
        lockout: Duration,
    ) -> Self {
        Self {
            storage,
            secret: secret.into(),
            max_attempts: max_attempts.max(1),
            lockout,
        }
    }

    pub fn from_config(storage: Arc<dyn KeyValueStore>, config: &AppConfig) -> Self {
        Self::new(
            storage,
            config.passcode.clone(),
            config.max_attempts,
            Duration::minutes(i64::from(config.lockout_minutes)),
        )
    }

    pub fn is_authenticated(&self) -> AppResult<bool> {
        Ok(self.storage.get(AUTH_FLAG_KEY)?.as_deref() == Some("true"))
    }

    pub fn status(&self) -> AppResult<GateStatus> {
        self.status_at(Utc::now())
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> AppResult<GateStatus> {
        if self.is_authenticated()? {
            return Ok(GateStatus::Authenticated);
        }
        let record = self.refresh_at(now)?;
        Ok(match record.locked_until(now) {
            Some(until) => GateStatus::Locked {
                until: format_instant(until),
                remaining_seconds: (until - now).num_seconds(),
            },
            None => GateStatus::Open {
                attempts_remaining: self.max_attempts.saturating_sub(record.attempt_count),
            },
        })
    }

    /// Clear a lockout whose expiry has passed. Returns the effective record.
    pub fn refresh_at(&self, now: DateTime<Utc>) -> AppResult<LockoutRecord> {
        let record = self.load_record()?;
        if record.is_expired(now) {
            tracing::info!("access gate lockout expired");
            self.storage.remove(LOCKOUT_KEY)?;
            return Ok(LockoutRecord::default());
        }
        Ok(record)
    }

    pub fn submit(&self, code: &str) -> AppResult<GateOutcome> {
        self.submit_at(code, Utc::now())
    }

    /// Check `code` against the secret.
    ///
    /// While locked the code is not compared at all.
    pub fn submit_at(&self, code: &str, now: DateTime<Utc>) -> AppResult<GateOutcome> {
        let mut record = self.refresh_at(now)?;

        if let Some(until) = record.locked_until(now) {
            tracing::warn!("access gate submission rejected while locked");
            return Ok(locked_out(until, now));
        }

        if code == self.secret {
            self.storage.set(AUTH_FLAG_KEY, "true")?;
            self.storage.remove(LOCKOUT_KEY)?;
            tracing::info!("access gate unlocked");
            return Ok(GateOutcome::Granted);
        }

        record.attempt_count = record.attempt_count.saturating_add(1);
        let outcome = if record.attempt_count >= self.max_attempts {
            let until = now + self.lockout;
            record.end_time = Some(until.timestamp_millis());
            tracing::info!(attempts = record.attempt_count, "access gate locked");
            locked_out(until, now)
        } else {
            let attempts_remaining = self.max_attempts - record.attempt_count;
            tracing::warn!(attempts_remaining, "access gate submission failed");
            GateOutcome::Denied { attempts_remaining }
        };

        self.storage
            .set(LOCKOUT_KEY, &serde_json::to_string(&record)?)?;
        Ok(outcome)
    }

    /// Forget the authenticated flag
    pub fn sign_out(&self) -> AppResult<()> {
        self.storage.remove(AUTH_FLAG_KEY)
    }

    fn load_record(&self) -> AppResult<LockoutRecord> {
        Ok(match self.storage.get(LOCKOUT_KEY)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "discarding unreadable lockout record");
                LockoutRecord::default()
            }),
            None => LockoutRecord::default(),
        })
    }
}

fn locked_out(until: DateTime<Utc>, now: DateTime<Utc>) -> GateOutcome {
    GateOutcome::LockedOut {
        until: format_instant(until),
        remaining_seconds: (until - now).num_seconds(),
    }
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}
