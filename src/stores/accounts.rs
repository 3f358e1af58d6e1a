use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use crate::dto::AccountRecord;

/// Shared `username -> password` mapping.
///
/// Cloning the store clones the handle; all clones see the same accounts.
/// Every operation takes the lock once, so readers observe each upsert either
/// completely or not at all.
#[derive(Clone, Default)]
pub struct AccountStore {
    accounts: Arc<RwLock<HashMap<String, String>>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the password for `record.username`. Last write wins.
    pub fn upsert(&self, record: AccountRecord) {
        let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
        accounts.insert(record.username, record.password);
    }

    pub fn get(&self, username: &str) -> Option<String> {
        let accounts = self.accounts.read().unwrap_or_else(PoisonError::into_inner);
        accounts.get(username).cloned()
    }

    /// Point-in-time set of all usernames.
    pub fn snapshot(&self) -> HashSet<String> {
        let accounts = self.accounts.read().unwrap_or_else(PoisonError::into_inner);
        accounts.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.accounts.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
