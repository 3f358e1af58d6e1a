//! Credential checks for provisioned accounts and for the operator.
//!
//! Passwords are plain strings compared byte for byte. A wrong password and an
//! unknown username are indistinguishable to the caller.

use crate::stores::AccountStore;

#[derive(Clone)]
pub struct Authenticator {
    accounts: AccountStore,
}

impl Authenticator {
    pub fn new(accounts: AccountStore) -> Self {
        Self { accounts }
    }

    /// True iff `username` is provisioned with exactly `password`.
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        self.accounts
            .get(username)
            .is_some_and(|expected| expected == password)
    }
}

/// Operator credentials for the administrative login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}
