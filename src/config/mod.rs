use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use log::warn;

use crate::services::render_service::DEFAULT_LINK_PREFIX;

const DEFAULT_PORT: u16 = 5004;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_USER_HEADER: &str = "X-Wiki-User";

/// Application configuration and constants
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: Arc<PathBuf>,
    pub static_dir: Arc<PathBuf>,
    pub port: u16,
    pub host: String,
    pub link_prefix: String,
    /// Header carrying the user name set by the upstream auth layer
    pub user_header: String,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            data_dir: Arc::new(PathBuf::from("wiki")),
            static_dir: Arc::new(PathBuf::from("static")),
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
            link_prefix: DEFAULT_LINK_PREFIX.to_string(),
            user_header: DEFAULT_USER_HEADER.to_string(),
        }
    }

    /// Defaults overridden by `FOLIO_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new();
        if let Some(dir) = lookup("FOLIO_DATA_DIR") {
            config.data_dir = Arc::new(PathBuf::from(dir));
        }
        if let Some(dir) = lookup("FOLIO_STATIC_DIR") {
            config.static_dir = Arc::new(PathBuf::from(dir));
        }
        if let Some(host) = lookup("FOLIO_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("FOLIO_PORT") {
            match port.parse() {
                Ok(port) => config.port = port,
                Err(_) => warn!("Ignoring invalid FOLIO_PORT '{}', using {}", port, DEFAULT_PORT),
            }
        }
        if let Some(prefix) = lookup("FOLIO_LINK_PREFIX") {
            config.link_prefix = prefix;
        }
        if let Some(header) = lookup("FOLIO_USER_HEADER") {
            config.user_header = header;
        }
        config
    }

    /// Get the socket address for binding
    pub fn socket_addr(&self) -> SocketAddr {
        let ip = self.host.parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid host '{}', binding {}", self.host, DEFAULT_HOST);
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        });
        SocketAddr::new(ip, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(*config.data_dir, PathBuf::from("wiki"));
        assert_eq!(config.link_prefix, "#/wiki");
        assert_eq!(config.user_header, "X-Wiki-User");
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:5004");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("FOLIO_DATA_DIR", "/srv/pages"),
            ("FOLIO_HOST", "127.0.0.1"),
            ("FOLIO_PORT", "8080"),
            ("FOLIO_LINK_PREFIX", "/wiki"),
        ]));
        assert_eq!(*config.data_dir, PathBuf::from("/srv/pages"));
        assert_eq!(config.link_prefix, "/wiki");
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = Config::from_lookup(lookup(&[("FOLIO_PORT", "http")]));
        assert_eq!(config.port, 5004);
    }
}
