use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::domain::{
    common::entities::app_errors::CoreError,
    entitlement::{
        entities::{EntitlementState, RegisteredUser, TRIAL_CREDITS},
        policies::{digits_only, is_duplicate_registration, validate_card, validate_trial},
        value_objects::{CardPayment, TrialRegistration},
    },
    session::entities::Mode,
    storage::{KeyValueStore, StorageKey, TRUE_TOKEN},
};

/// Owns the credit/paid accounting for the session.
///
/// The in-memory state is authoritative; store writes are best effort and only
/// matter for the next session.
#[derive(Debug)]
pub struct EntitlementManager<S: KeyValueStore> {
    store: Arc<S>,
    state: EntitlementState,
}

impl<S: KeyValueStore> EntitlementManager<S> {
    /// Loads the durable entitlement and returns the mode the session starts in.
    pub fn initialize(store: Arc<S>) -> (Self, Mode) {
        let state = EntitlementState::load(store.as_ref());
        let mode = state.initial_mode();

        info!(
            is_paid = state.is_paid,
            credits = state.credits,
            initial_mode = %mode,
            "entitlement loaded"
        );

        (Self { store, state }, mode)
    }

    pub fn state(&self) -> EntitlementState {
        self.state
    }

    pub fn is_paid(&self) -> bool {
        self.state.is_paid
    }

    pub fn credits(&self) -> u32 {
        self.state.credits
    }

    pub fn can_consume(&self) -> bool {
        self.state.can_consume()
    }

    /// Charges one credit for a completed analysis. Unlimited when paid.
    pub fn consume(&mut self) -> bool {
        if self.state.is_paid {
            return true;
        }

        if self.state.credits == 0 {
            return false;
        }

        self.state.credits -= 1;
        self.write(StorageKey::Credits, &self.state.credits.to_string());
        info!(credits = self.state.credits, "credit consumed");
        true
    }

    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub fn grant_trial(&mut self, registration: &TrialRegistration) -> Result<(), CoreError> {
        validate_trial(registration)?;

        if self.state.trial_used {
            return Err(CoreError::Validation(
                "the free trial was already used on this device".to_string(),
            ));
        }

        let stored = self.registered_users();
        if let Some(entries) = &stored {
            let registered: Vec<RegisteredUser> = entries
                .iter()
                .filter_map(|entry| RegisteredUser::deserialize(entry).ok())
                .collect();
            if is_duplicate_registration(&registered, &registration.email, &registration.phone) {
                return Err(CoreError::Validation(
                    "this email or phone already used the free trial".to_string(),
                ));
            }
        }

        match stored {
            Some(entries) => self.record_registration(entries, registration),
            None => warn!("registered users record is unreadable, leaving it untouched"),
        }

        self.state.credits = TRIAL_CREDITS;
        self.state.trial_used = true;
        self.write(StorageKey::Credits, &TRIAL_CREDITS.to_string());
        self.write(StorageKey::TrialUsed, TRUE_TOKEN);

        info!(credits = TRIAL_CREDITS, "trial granted");
        Ok(())
    }

    #[instrument(skip_all)]
    pub fn grant_lifetime(&mut self, payment: &CardPayment) -> Result<(), CoreError> {
        validate_card(payment)?;

        self.state.is_paid = true;
        self.write(StorageKey::Paid, TRUE_TOKEN);

        info!("lifetime access granted");
        Ok(())
    }

    /// Trial dedup list as stored, entries kept verbatim. `None` when the record
    /// exists but cannot be read.
    fn registered_users(&self) -> Option<Vec<Value>> {
        let raw = match self.store.get(StorageKey::RegisteredUsers.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Some(Vec::new()),
            Err(e) => {
                warn!(error = %e, "failed to read registered users");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => Some(entries),
            Err(e) => {
                warn!(error = %e, "registered users record is corrupt");
                None
            }
        }
    }

    fn record_registration(&self, mut entries: Vec<Value>, registration: &TrialRegistration) {
        let user = RegisteredUser::new(
            &registration.email,
            digits_only(&registration.phone),
            registration.full_name(),
        );

        let serialized = serde_json::to_value(user).and_then(|user| {
            entries.push(user);
            serde_json::to_string(&entries)
        });
        match serialized {
            Ok(serialized) => self.write(StorageKey::RegisteredUsers, &serialized),
            Err(e) => warn!(error = %e, "failed to serialize registered users"),
        }
    }

    fn write(&self, key: StorageKey, value: &str) {
        if let Err(e) = self.store.set(key.as_str(), value) {
            warn!(key = %key, error = %e, "failed to persist entitlement change");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::{MockKeyValueStore, StorageError};
    use crate::infrastructure::storage::MemoryKeyValueStore;

    fn store_with(entries: &[(StorageKey, &str)]) -> Arc<MemoryKeyValueStore> {
        let store = MemoryKeyValueStore::new();
        for (key, value) in entries {
            store.set(key.as_str(), value).unwrap();
        }
        Arc::new(store)
    }

    fn registration(email: &str, phone: &str) -> TrialRegistration {
        TrialRegistration {
            coupon: "08G".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Souza".to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        }
    }

    #[test]
    fn test_initialize_defaults_missing_values() {
        let (manager, mode) = EntitlementManager::initialize(store_with(&[]));
        assert_eq!(mode, Mode::Payment);
        assert_eq!(manager.state(), EntitlementState::default());
    }

    #[test]
    fn test_initialize_treats_malformed_values_as_defaults() {
        let store = store_with(&[
            (StorageKey::Paid, "TRUE"),
            (StorageKey::Credits, "three"),
        ]);
        let (manager, mode) = EntitlementManager::initialize(store);
        assert!(!manager.is_paid());
        assert_eq!(manager.credits(), 0);
        assert_eq!(mode, Mode::Payment);

        let (manager, _) = EntitlementManager::initialize(store_with(&[(StorageKey::Credits, "-4")]));
        assert_eq!(manager.credits(), 0);
    }

    #[test]
    fn test_initialize_with_credits_or_paid_starts_onboarding() {
        let (_, mode) = EntitlementManager::initialize(store_with(&[(StorageKey::Credits, "1")]));
        assert_eq!(mode, Mode::Onboarding);

        let (_, mode) = EntitlementManager::initialize(store_with(&[(StorageKey::Paid, "true")]));
        assert_eq!(mode, Mode::Onboarding);
    }

    #[test]
    fn test_credit_monotonicity() {
        for initial in 0..4u32 {
            let credits = initial.to_string();
            let store = store_with(&[(StorageKey::Credits, credits.as_str())]);
            let (mut manager, _) = EntitlementManager::initialize(Arc::clone(&store));

            for n in 1..=6u32 {
                let consumed = manager.consume();
                assert_eq!(consumed, n <= initial);
                assert_eq!(manager.credits(), initial.saturating_sub(n));
            }

            assert!(!manager.consume());
            assert_eq!(manager.credits(), 0);
            let persisted = store.get(StorageKey::Credits.as_str()).unwrap();
            assert_eq!(persisted.as_deref(), Some("0"));
        }
    }

    #[test]
    fn test_paid_bypass_never_touches_credits() {
        let store = store_with(&[(StorageKey::Paid, "true"), (StorageKey::Credits, "1")]);
        let (mut manager, _) = EntitlementManager::initialize(store);

        for _ in 0..10 {
            assert!(manager.consume());
        }
        assert_eq!(manager.credits(), 1);
    }

    #[test]
    fn test_grant_trial_sets_two_credits_and_flag() {
        let store = store_with(&[]);
        let (mut manager, _) = EntitlementManager::initialize(Arc::clone(&store));

        manager
            .grant_trial(&registration("ana@example.com", "24999241876"))
            .unwrap();

        assert_eq!(manager.credits(), 2);
        assert!(!manager.is_paid());
        assert_eq!(
            store.get(StorageKey::Credits.as_str()).unwrap().as_deref(),
            Some("2")
        );
        assert_eq!(
            store.get(StorageKey::TrialUsed.as_str()).unwrap().as_deref(),
            Some("true")
        );

        let users: Vec<RegisteredUser> = serde_json::from_str(
            &store.get(StorageKey::RegisteredUsers.as_str()).unwrap().unwrap(),
        )
        .unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].phone, "24999241876");
        assert_eq!(users[0].name, "Ana Souza");
    }

    #[test]
    fn test_trial_dedup_rejects_same_email_any_case() {
        let existing = serde_json::json!([{
            "email": "a@b.com",
            "phone": "11911112222",
            "name": "A B",
            "date": "2025-01-01T00:00:00Z"
        }]);
        let existing = existing.to_string();
        let store = store_with(&[(StorageKey::RegisteredUsers, existing.as_str())]);
        let (mut manager, _) = EntitlementManager::initialize(store);

        for email in ["a@b.com", "A@B.COM", "A@b.Com"] {
            let error = manager
                .grant_trial(&registration(email, "21988887777"))
                .unwrap_err();
            assert!(matches!(error, CoreError::Validation(_)));
        }
        assert_eq!(manager.credits(), 0);
    }

    #[test]
    fn test_trial_cannot_be_granted_twice() {
        let (mut manager, _) = EntitlementManager::initialize(store_with(&[]));
        manager
            .grant_trial(&registration("one@example.com", "24999241876"))
            .unwrap();
        manager.consume();

        assert!(
            manager
                .grant_trial(&registration("two@example.com", "21988887777"))
                .is_err()
        );
        assert_eq!(manager.credits(), 1);
    }

    #[test]
    fn test_corrupt_registered_users_does_not_block_trial() {
        let store = store_with(&[(StorageKey::RegisteredUsers, "{oops")]);
        let (mut manager, _) = EntitlementManager::initialize(Arc::clone(&store));
        assert!(
            manager
                .grant_trial(&registration("ana@example.com", "24999241876"))
                .is_ok()
        );
        assert_eq!(
            store
                .get(StorageKey::RegisteredUsers.as_str())
                .unwrap()
                .as_deref(),
            Some("{oops")
        );
    }

    #[test]
    fn test_malformed_entry_keeps_dedup_and_the_rest_of_the_list() {
        let existing = serde_json::json!([
            {
                "email": "a@b.com",
                "phone": "11911112222",
                "name": "A B",
                "date": "2025-01-01T00:00:00Z"
            },
            { "email": "c@d.com", "phone": "11933334444", "date": "ontem" },
            42
        ])
        .to_string();
        let store = store_with(&[(StorageKey::RegisteredUsers, existing.as_str())]);
        let (mut manager, _) = EntitlementManager::initialize(Arc::clone(&store));

        for (email, phone) in [("A@B.COM", "21988887777"), ("x@y.com", "(11) 93333-4444")] {
            let error = manager.grant_trial(&registration(email, phone)).unwrap_err();
            assert!(matches!(error, CoreError::Validation(_)));
        }
        assert_eq!(manager.credits(), 0);
        assert_eq!(
            store
                .get(StorageKey::RegisteredUsers.as_str())
                .unwrap()
                .as_deref(),
            Some(existing.as_str())
        );

        manager
            .grant_trial(&registration("new@example.com", "21988887777"))
            .unwrap();

        let entries: Vec<Value> = serde_json::from_str(
            &store.get(StorageKey::RegisteredUsers.as_str()).unwrap().unwrap(),
        )
        .unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[1]["date"], "ontem");
        assert_eq!(entries[2], 42);
        assert_eq!(entries[3]["email"], "new@example.com");
    }

    #[test]
    fn test_grant_lifetime_keeps_credits() {
        let store = store_with(&[(StorageKey::Credits, "1")]);
        let (mut manager, _) = EntitlementManager::initialize(Arc::clone(&store));

        let payment = CardPayment {
            card_number: "4111 1111 1111 1111".to_string(),
            holder_name: "Ana Souza".to_string(),
            expiry: "12/29".to_string(),
            cvv: "123".to_string(),
        };
        manager.grant_lifetime(&payment).unwrap();

        assert!(manager.is_paid());
        assert_eq!(manager.credits(), 1);
        assert_eq!(
            store.get(StorageKey::Paid.as_str()).unwrap().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_invalid_card_mutates_nothing() {
        let (mut manager, _) = EntitlementManager::initialize(store_with(&[]));
        let payment = CardPayment {
            card_number: "1234 5678 9012 3456".to_string(),
            holder_name: "Ana Souza".to_string(),
            expiry: "12/29".to_string(),
            cvv: "123".to_string(),
        };
        assert!(manager.grant_lifetime(&payment).is_err());
        assert!(!manager.is_paid());
    }

    #[test]
    fn test_failed_writes_keep_in_memory_state() {
        let mut store = MockKeyValueStore::new();
        store.expect_get().returning(|key| {
            Ok((key == StorageKey::Credits.as_str()).then(|| "2".to_string()))
        });
        store
            .expect_set()
            .returning(|_, _| Err(StorageError::Io("disk full".to_string())));

        let (mut manager, mode) = EntitlementManager::initialize(Arc::new(store));
        assert_eq!(mode, Mode::Onboarding);
        assert!(manager.consume());
        assert_eq!(manager.credits(), 1);
    }
}
