//! Durable preferences for connection parameters.
//!
//! Preferences are a flat string key-value table persisted as TOML under the
//! user config directory. Each field lives under its own key, so partial
//! saves are possible and harmless:
//!
//! | Key          | Meaning                     | Default     |
//! |--------------|-----------------------------|-------------|
//! | `hostName`   | device hostname or address  | `localhost` |
//! | `portNumber` | device TCP port             | `8000`      |
//! | `refreshTime`| poll interval, milliseconds | `1000`      |
//! | `activePage` | last active UI page index   | `0`         |
//!
//! Loading never fails: a missing file, unreadable file, or invalid field
//! degrades to the defaults with a logged warning.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::client::DeviceClient;

/// Preference key for the device hostname.
pub const KEY_HOST: &str = "hostName";
/// Preference key for the device port.
pub const KEY_PORT: &str = "portNumber";
/// Preference key for the poll interval in milliseconds.
pub const KEY_REFRESH: &str = "refreshTime";
/// Preference key for the last active UI page.
pub const KEY_ACTIVE_PAGE: &str = "activePage";

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_REFRESH_MS: u64 = 1000;

/// Connection parameters for the remote device.
///
/// Loaded once at startup, mutated only by an explicit save action, and
/// applied immediately (a save restarts the poller with the new interval).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Device hostname or address.
    pub host: String,
    /// Device TCP port.
    pub port: u16,
    /// Poll interval in milliseconds. Always > 0.
    pub refresh_interval_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            refresh_interval_ms: DEFAULT_REFRESH_MS,
        }
    }
}

/// Durable key-value preferences store.
pub struct Preferences {
    path: PathBuf,
    table: toml::Table,
}

impl Preferences {
    /// Default preferences file path under the user config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sensegrid")
            .join("prefs.toml")
    }

    /// Open the preferences store at the default path.
    pub fn open_default() -> Self {
        Self::open(Self::default_path())
    }

    /// Open a preferences store backed by the given file.
    ///
    /// A missing or unparsable file yields an empty store (defaults apply).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let table = match fs::read_to_string(&path) {
            Ok(content) => match content.parse::<toml::Table>() {
                Ok(table) => table,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse preferences, using defaults");
                    toml::Table::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => toml::Table::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read preferences, using defaults");
                toml::Table::new()
            }
        };

        Self { path, table }
    }

    /// The file this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a raw string value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.table.get(key).and_then(toml::Value::as_str)
    }

    /// Set a raw string value and persist the table.
    pub fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.table
            .insert(key.to_string(), toml::Value::String(value.to_string()));
        self.persist()
    }

    fn persist(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&self.table)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, content)
    }

    /// Load the connection parameters, falling back to defaults for any
    /// missing or invalid field. Never fails.
    pub fn load_connection(&self) -> ConnectionConfig {
        let defaults = ConnectionConfig::default();

        // A host the HTTP client would refuse must not survive a reload, or
        // the next startup fails before the operator can correct it.
        let host = match self.get(KEY_HOST) {
            Some(value) if DeviceClient::is_valid_host(value) => value.trim().to_string(),
            Some(value) if !value.trim().is_empty() => {
                warn!(host = value, "Saved host is unusable, using default");
                defaults.host
            }
            _ => defaults.host,
        };

        let port = self
            .get(KEY_PORT)
            .and_then(|value| value.trim().parse::<u16>().ok())
            .filter(|port| *port != 0)
            .unwrap_or(defaults.port);

        let refresh_interval_ms = self
            .get(KEY_REFRESH)
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|interval| *interval != 0)
            .unwrap_or(defaults.refresh_interval_ms);

        ConnectionConfig {
            host,
            port,
            refresh_interval_ms,
        }
    }

    /// Persist the connection parameters, one key at a time.
    ///
    /// Each field is written independently; a failed write is logged and the
    /// remaining fields are still attempted, so a partial save leaves the
    /// store internally consistent (every key is individually valid).
    pub fn save_connection(&mut self, config: &ConnectionConfig) {
        let fields = [
            (KEY_HOST, config.host.clone()),
            (KEY_PORT, config.port.to_string()),
            (KEY_REFRESH, config.refresh_interval_ms.to_string()),
        ];
        for (key, value) in fields {
            if let Err(e) = self.set(key, &value) {
                warn!(key, error = %e, "Failed to persist preference");
            }
        }
    }

    /// Last active UI page index (0 when unset or invalid).
    pub fn active_page(&self) -> usize {
        self.get(KEY_ACTIVE_PAGE)
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0)
    }

    /// Persist the active UI page index.
    pub fn set_active_page(&mut self, index: usize) {
        if let Err(e) = self.set(KEY_ACTIVE_PAGE, &index.to_string()) {
            warn!(error = %e, "Failed to persist active page");
        }
    }
}
