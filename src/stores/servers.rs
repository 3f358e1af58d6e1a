use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

use crate::dto::Server;
use crate::error::{Error, Result};

/// Append-only list of servers, kept in insertion order for display.
#[derive(Clone, Default)]
pub struct ServerRegistry {
    servers: Arc<Mutex<Vec<Server>>>,
}

impl ServerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-populated with `servers`, in the given order.
    pub fn with_servers(servers: impl IntoIterator<Item = Server>) -> Self {
        Self {
            servers: Arc::new(Mutex::new(servers.into_iter().collect())),
        }
    }

    /// Appends a server. Both fields are required; duplicates are allowed.
    ///
    /// The values are stored as given; whitespace is only considered for the
    /// emptiness check.
    pub fn add(&self, name: &str, address: &str) -> Result<()> {
        if name.trim().is_empty() || address.trim().is_empty() {
            return Err(Error::validation("server name and address are required"));
        }
        let server = Server {
            name: name.to_string(),
            address: address.to_string(),
        };
        self.servers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(server);
        info!(%name, %address, "server registered");
        Ok(())
    }

    /// Snapshot of all servers, oldest first.
    pub fn list(&self) -> Vec<Server> {
        self.servers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// First registered server with the given address.
    pub fn find_by_address(&self, address: &str) -> Option<Server> {
        self.servers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|server| server.address == address)
            .cloned()
    }
}
