pub mod auth;
pub mod config;
mod dto;
mod engine;
mod error;
mod http;
pub mod logging;
pub mod namespace;
pub mod normalizer;
pub mod readers;
mod runner;
mod stores;

pub use auth::{AdminCredentials, Authenticator};
pub use dto::{AccountRecord, ProvisioningResult, RecordFormat, Server};
pub use engine::ProvisioningService;
pub use error::{Error, Result};
pub use http::{build_router, ApiError, AppState};
pub use namespace::{DirectoryNamespaces, NamespaceProvisioner, NoNamespaces};
pub use runner::{provision_async, provision_path};
pub use stores::{AccountStore, ServerRegistry};
