use std::fmt;

/// Serialized form of boolean flags in the store. Anything else reads as `false`.
pub const TRUE_TOKEN: &str = "true";

/// Keys recognised in the durable key/value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Paid,
    Credits,
    TrialUsed,
    History,
    RegisteredUsers,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Paid => "orix_paid",
            StorageKey::Credits => "orix_credits",
            StorageKey::TrialUsed => "orix_trial_used",
            StorageKey::History => "orix_recipe_history",
            StorageKey::RegisteredUsers => "orix_registered_users",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
