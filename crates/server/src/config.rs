//! Server configuration loaded from the environment.
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use runtime::repository::default_database_url;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    /// Directory for daily rolling log files. Logs go to stderr only when unset.
    pub log_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub const DEFAULT_BIND_ADDR: SocketAddr =
        SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST), 3000);

    /// Construct configuration from process environment variables.
    ///
    /// - `CLASH_BIND_ADDR` - Listen address (default: 127.0.0.1:3000)
    /// - `DATABASE_URL` - SQLite URL (default: platform data directory)
    /// - `CLASH_LOG_DIR` - Optional log file directory
    pub fn from_env() -> Self {
        let bind_addr = env::var("CLASH_BIND_ADDR")
            .ok()
            .and_then(|value| match value.parse() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    tracing::warn!(%value, "ignoring invalid CLASH_BIND_ADDR");
                    None
                }
            })
            .unwrap_or(Self::DEFAULT_BIND_ADDR);

        Self {
            bind_addr,
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| default_database_url()),
            log_dir: env::var_os("CLASH_LOG_DIR").map(PathBuf::from),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: Self::DEFAULT_BIND_ADDR,
            database_url: default_database_url(),
            log_dir: None,
        }
    }
}
