//! Web application configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable | Default |
//! |---|---|
//! | `READLOG_BIND` | `127.0.0.1:5000` |
//! | `READLOG_DATA_DIR` | platform data dir (`~/.local/share/readlog` on Linux), else `./instance` |
//! | `READLOG_DB_MAX_CONNECTIONS` | `5` |

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use directories::ProjectDirs;

/// File name of the library database inside the data directory.
pub const DATABASE_FILE: &str = "library.db";

const DEFAULT_BIND: &str = "127.0.0.1:5000";
const DEFAULT_MAX_CONNECTIONS: &str = "5";

/// Web application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,

    /// Directory holding the database; created on startup.
    pub data_dir: PathBuf,

    /// Upper bound on pooled SQLite connections.
    pub db_max_connections: u32,
}

impl WebConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup("READLOG_BIND")
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("READLOG_BIND".to_string()))?;

        let data_dir = lookup("READLOG_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let db_max_connections: u32 = lookup("READLOG_DB_MAX_CONNECTIONS")
            .unwrap_or_else(|| DEFAULT_MAX_CONNECTIONS.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("READLOG_DB_MAX_CONNECTIONS".to_string()))?;

        if db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "READLOG_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(WebConfig {
            bind_addr,
            data_dir,
            db_max_connections,
        })
    }

    /// Full path of the SQLite file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

/// Platform-specific app data directory.
///
/// - **macOS**: `~/Library/Application Support/org.readlog.readlog`
/// - **Windows**: `%APPDATA%\readlog\readlog\data`
/// - **Linux**: `~/.local/share/readlog`
fn default_data_dir() -> PathBuf {
    ProjectDirs::from("org", "readlog", "readlog")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("instance"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
