//! Per-account storage namespaces.
//!
//! Provisioning asks for one namespace per account. Creation is idempotent and
//! failures are reported to the caller, which logs them and moves on.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

pub trait NamespaceProvisioner: Send + Sync {
    /// Creates the namespace for `username` if it does not exist yet.
    fn ensure_namespace(&self, username: &str) -> Result<()>;
}

/// One directory per account under a common root.
#[derive(Debug, Clone)]
pub struct DirectoryNamespaces {
    root: PathBuf,
}

impl DirectoryNamespaces {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for `username`, or an error if the name would not map to
    /// exactly one directory directly below the root.
    pub fn path_for(&self, username: &str) -> Result<PathBuf> {
        let mut components = Path::new(username).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if name == username => Ok(self.root.join(name)),
            _ => Err(Error::Namespace(format!(
                "username {username:?} is not a valid directory name"
            ))),
        }
    }
}

impl NamespaceProvisioner for DirectoryNamespaces {
    fn ensure_namespace(&self, username: &str) -> Result<()> {
        let path = self.path_for(username)?;
        std::fs::create_dir_all(&path)
            .map_err(|err| Error::Namespace(format!("cannot create {}: {err}", path.display())))
    }
}

/// Discards every request. For deployments that only need the account store.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNamespaces;

impl NamespaceProvisioner for NoNamespaces {
    fn ensure_namespace(&self, _username: &str) -> Result<()> {
        Ok(())
    }
}
