// src/config.rs
//! Startup configuration.
//!
//! Read once from environment variables (a `.env` file is honored through
//! dotenv in `main`). Every setting has a default; an unset variable is
//! logged and the default used, a malformed one aborts startup.

use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Runtime settings of the verification service.
pub struct AppConfig {
    /// Socket address the API server binds to
    pub bind_addr: SocketAddr,
    /// Directory holding the durable storage records
    pub storage_dir: PathBuf,
    /// How often the return watcher probes the external context
    pub poll_interval: Duration,
    /// How long the return watcher runs before giving up
    pub poll_timeout: Duration,
}

impl AppConfig {
    /// Loads settings from the environment.
    pub fn load() -> Self {
        AppConfig {
            bind_addr: try_load("CERT_VERIFY_ADDR", "127.0.0.1:3000"),
            storage_dir: PathBuf::from(
                env::var("CERT_VERIFY_STORAGE_DIR").unwrap_or_else(|_| ".cert-verify".to_string()),
            ),
            poll_interval: Duration::from_secs(try_load("CERT_VERIFY_POLL_INTERVAL_SECS", "2")),
            poll_timeout: Duration::from_secs(try_load("CERT_VERIFY_POLL_TIMEOUT_SECS", "300")),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            log::info!("{} not set, using default: {}", key, default);
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            log::error!("invalid {} value: {}", key, e);
        })
        .expect("environment misconfigured")
}
