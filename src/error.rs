//! Errors for the account provisioning system.
//!
//! Two tiers of failure exist:
//! - Stream-level failures ([`Error::MalformedInput`]) abort a whole provisioning call.
//! - Row-level problems are not errors at all; malformed rows are dropped and counted.
//!
//! Registry and configuration input is rejected with [`Error::Validation`].
//! [`Error::Namespace`] is produced by namespace collaborators and is only ever
//! logged by the provisioning engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("namespace error: {0}")]
    Namespace(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::MalformedInput(err.to_string())
    }
}

impl From<csv_async::Error> for Error {
    fn from(err: csv_async::Error) -> Self {
        Self::MalformedInput(err.to_string())
    }
}

impl From<calamine::Error> for Error {
    fn from(err: calamine::Error) -> Self {
        Self::MalformedInput(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::MalformedInput(err.to_string())
    }
}
