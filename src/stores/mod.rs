//! Shared in-memory state. Provides storage for:
//! - Provisioned accounts ([`AccountStore`])
//! - Servers offered for session routing ([`ServerRegistry`])
//!
//! Both are cheap-to-clone handles around a single lock. They are built once at
//! startup and handed to every request handler; nothing is persisted.

mod accounts;
mod servers;

pub use accounts::AccountStore;
pub use servers::ServerRegistry;
