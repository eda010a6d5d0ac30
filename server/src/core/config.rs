//! Application configuration
//!
//! Layered: built-in defaults < JSON config file < environment < CLI flags.
//! The CLI layer is handled by clap (which also reads the env mirrors), so
//! this module only merges file values under CLI/env-provided ones.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PORT, TOTALS_TOLERANCE,
};

/// Server bind configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// When false, every request acts as the seeded local admin
    pub enabled: bool,
    /// HS256 secret shared with the external identity provider
    pub secret: Option<String>,
}

/// Aggregation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Absolute tolerance for totals cross-checks (currency minor units)
    pub totals_tolerance: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            totals_tolerance: TOTALS_TOLERANCE,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub analytics: AnalyticsConfig,
    pub debug: bool,
}

/// On-disk config file shape (all fields optional)
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    host: Option<String>,
    port: Option<u16>,
    auth_secret: Option<String>,
    totals_tolerance: Option<f64>,
}

impl AppConfig {
    /// Load configuration, merging the optional config file under CLI/env values
    pub fn load(cli: &CliConfig) -> Result<Self> {
        let file = match Self::resolve_config_path(cli) {
            Some(path) => Self::read_config_file(&path)?,
            None => ConfigFile::default(),
        };

        let server = ServerConfig {
            host: cli
                .host
                .clone()
                .or(file.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: cli.port.or(file.port).unwrap_or(DEFAULT_PORT),
        };

        let secret = cli.auth_secret.clone().or(file.auth_secret);
        let auth = AuthConfig {
            enabled: !cli.no_auth,
            secret,
        };

        if auth.enabled && auth.secret.is_none() {
            anyhow::bail!(
                "Authentication is enabled but no token secret is configured. \
                 Set FOLIO_AUTH_SECRET (or pass --no-auth for local use)."
            );
        }

        let analytics = AnalyticsConfig {
            totals_tolerance: file.totals_tolerance.unwrap_or(TOTALS_TOLERANCE),
        };

        Ok(Self {
            server,
            auth,
            analytics,
            debug: cli.debug,
        })
    }

    /// Resolve the config file path: explicit flag, else `./.folio/folio.json`
    fn resolve_config_path(cli: &CliConfig) -> Option<PathBuf> {
        if let Some(path) = &cli.config {
            return Some(path.clone());
        }

        let local = PathBuf::from(APP_DOT_FOLDER).join(CONFIG_FILE_NAME);
        local.exists().then_some(local)
    }

    fn read_config_file(path: &Path) -> Result<ConfigFile> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }
}

/// Whether the host binds all interfaces
pub fn is_all_interfaces(host: &str) -> bool {
    host == "0.0.0.0" || host == "::"
}
