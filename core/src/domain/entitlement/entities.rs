use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::{
    session::entities::Mode,
    storage::{KeyValueStore, StorageKey, TRUE_TOKEN},
};

/// Credits handed out by a validated trial coupon.
pub const TRIAL_CREDITS: u32 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EntitlementState {
    pub is_paid: bool,
    pub credits: u32,
    pub trial_used: bool,
}

impl EntitlementState {
    /// Reads the durable flags, defaulting anything missing or malformed.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        Self {
            is_paid: read_flag(store, StorageKey::Paid),
            credits: read_credits(store),
            trial_used: read_flag(store, StorageKey::TrialUsed),
        }
    }

    pub fn can_consume(&self) -> bool {
        self.is_paid || self.credits > 0
    }

    pub fn initial_mode(&self) -> Mode {
        if self.can_consume() {
            Mode::Onboarding
        } else {
            Mode::Payment
        }
    }
}

fn read_flag<S: KeyValueStore + ?Sized>(store: &S, key: StorageKey) -> bool {
    match store.get(key.as_str()) {
        Ok(value) => value.as_deref() == Some(TRUE_TOKEN),
        Err(e) => {
            warn!(key = %key, error = %e, "failed to read flag, assuming false");
            false
        }
    }
}

fn read_credits<S: KeyValueStore + ?Sized>(store: &S) -> u32 {
    let raw = match store.get(StorageKey::Credits.as_str()) {
        Ok(Some(raw)) => raw,
        Ok(None) => return 0,
        Err(e) => {
            warn!(error = %e, "failed to read credits, assuming 0");
            return 0;
        }
    };

    match raw.trim().parse::<i64>() {
        Ok(credits) if credits > 0 => u32::try_from(credits).unwrap_or(u32::MAX),
        Ok(_) => 0,
        Err(_) => {
            warn!(value = %raw, "non-numeric credits value, resetting to 0");
            0
        }
    }
}

/// Entry of the trial dedup list. Only `email` and `phone` take part in dedup,
/// so every field may be missing on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisteredUser {
    pub email: String,
    pub phone: String,
    pub name: String,
    /// RFC 3339 registration time, kept as written.
    pub date: String,
}

impl RegisteredUser {
    pub fn new(email: &str, phone_digits: String, name: String) -> Self {
        Self {
            email: email.trim().to_lowercase(),
            phone: phone_digits,
            name,
            date: Utc::now().to_rfc3339(),
        }
    }
}
