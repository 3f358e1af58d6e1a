//! Startup configuration read from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::{
    auth::AdminCredentials,
    dto::Server,
    error::{Error, Result},
};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_NAMESPACE_ROOT: &str = "uploads";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub namespace_root: PathBuf,
    pub max_upload_bytes: usize,
    pub admin: Option<AdminCredentials>,
    pub seed_servers: Vec<Server>,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            namespace_root: PathBuf::from(DEFAULT_NAMESPACE_ROOT),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            admin: None,
            seed_servers: Vec::new(),
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Loads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration from an arbitrary key lookup; unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut cfg = Self::default();

        if let Some(host) = get("ROSTER_HOST") {
            cfg.host = host.trim().to_string();
        }
        if let Some(port) = get("ROSTER_PORT") {
            cfg.port = match port.trim().parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => return Err(Error::validation("ROSTER_PORT must be in 1..=65535")),
            };
        }
        if let Some(root) = get("ROSTER_NAMESPACE_ROOT") {
            cfg.namespace_root = PathBuf::from(root);
        }
        if let Some(limit) = get("ROSTER_MAX_UPLOAD_BYTES") {
            cfg.max_upload_bytes = match limit.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    return Err(Error::validation(
                        "ROSTER_MAX_UPLOAD_BYTES must be a positive integer",
                    ))
                }
            };
        }
        cfg.admin = match (get("ROSTER_ADMIN_USER"), get("ROSTER_ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminCredentials { username, password }),
            (None, None) => None,
            _ => {
                return Err(Error::validation(
                    "ROSTER_ADMIN_USER and ROSTER_ADMIN_PASSWORD must be set together",
                ))
            }
        };
        if let Some(servers) = get("ROSTER_SEED_SERVERS") {
            cfg.seed_servers = parse_servers(&servers)?;
        }
        if let Some(format) = get("LOG_FORMAT") {
            cfg.log_format = match format.trim().to_ascii_lowercase().as_str() {
                "compact" => LogFormat::Compact,
                "json" => LogFormat::Json,
                other => return Err(Error::validation(format!("unknown LOG_FORMAT {other:?}"))),
            };
        }
        Ok(cfg)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|err| Error::validation(format!("invalid bind address: {err}")))
    }
}

/// Parses `name=address` pairs separated by commas.
fn parse_servers(value: &str) -> Result<Vec<Server>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((name, address)) if !name.trim().is_empty() && !address.trim().is_empty() => {
                Ok(Server {
                    name: name.trim().to_string(),
                    address: address.trim().to_string(),
                })
            }
            _ => Err(Error::validation(format!(
                "invalid ROSTER_SEED_SERVERS entry {entry:?}, expected name=address"
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let cfg = load(&[])?;
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.bind_addr()?, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(cfg.namespace_root, PathBuf::from("uploads"));
        assert!(cfg.admin.is_none());
        Ok(())
    }

    #[test]
    fn test_overrides() -> Result<()> {
        let cfg = load(&[
            ("ROSTER_HOST", "0.0.0.0"),
            ("ROSTER_PORT", "9090"),
            ("ROSTER_NAMESPACE_ROOT", "/srv/roster"),
            ("ROSTER_MAX_UPLOAD_BYTES", "2048"),
            ("ROSTER_ADMIN_USER", "admin"),
            ("ROSTER_ADMIN_PASSWORD", "hunter2"),
            ("LOG_FORMAT", "JSON"),
        ])?;
        assert_eq!(cfg.bind_addr()?, "0.0.0.0:9090".parse().unwrap());
        assert_eq!(cfg.namespace_root, PathBuf::from("/srv/roster"));
        assert_eq!(cfg.max_upload_bytes, 2048);
        assert_eq!(
            cfg.admin,
            Some(AdminCredentials {
                username: "admin".to_string(),
                password: "hunter2".to_string(),
            })
        );
        assert_eq!(cfg.log_format, LogFormat::Json);
        Ok(())
    }

    #[test]
    fn test_blank_values_take_defaults() -> Result<()> {
        let cfg = load(&[("ROSTER_HOST", "  "), ("ROSTER_PORT", "")])?;
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 8080);
        Ok(())
    }

    #[test]
    fn test_invalid_port() {
        for port in ["0", "65536", "http"] {
            assert!(matches!(
                load(&[("ROSTER_PORT", port)]),
                Err(Error::Validation(_))
            ));
        }
    }

    #[test]
    fn test_invalid_upload_limit() {
        assert!(load(&[("ROSTER_MAX_UPLOAD_BYTES", "0")]).is_err());
        assert!(load(&[("ROSTER_MAX_UPLOAD_BYTES", "-1")]).is_err());
    }

    #[test]
    fn test_admin_requires_both_values() {
        assert!(matches!(
            load(&[("ROSTER_ADMIN_USER", "admin")]),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            load(&[("ROSTER_ADMIN_PASSWORD", "pw")]),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_seed_servers() -> Result<()> {
        let cfg = load(&[(
            "ROSTER_SEED_SERVERS",
            "Server1=192.168.1.1, Server2 = 192.168.1.2,",
        )])?;
        assert_eq!(
            cfg.seed_servers,
            vec![
                Server {
                    name: "Server1".to_string(),
                    address: "192.168.1.1".to_string(),
                },
                Server {
                    name: "Server2".to_string(),
                    address: "192.168.1.2".to_string(),
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn test_invalid_seed_servers() {
        assert!(load(&[("ROSTER_SEED_SERVERS", "Server1")]).is_err());
        assert!(load(&[("ROSTER_SEED_SERVERS", "=10.0.0.1")]).is_err());
        assert!(load(&[("ROSTER_SEED_SERVERS", "lab=")]).is_err());
    }

    #[test]
    fn test_unknown_log_format() {
        assert!(load(&[("LOG_FORMAT", "xml")]).is_err());
    }
}
