//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `INVITATION_TTL_DAYS` - Days before a pending invitation expires (default: 30, 1..=365)
//! - `TAXONOMY_SEED` - Path to a JSON file with the reference taxonomy lists
//!   (default: built-in lists)

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    pub invitation_ttl_days: i64,
    /// Reference taxonomy file. `None` uses the built-in lists.
    pub taxonomy_seed: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `INVITATION_TTL_DAYS` is set but not a number.
    pub fn from_env() -> Result<Self> {
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let invitation_ttl_days = match env::var("INVITATION_TTL_DAYS") {
            Ok(v) => v
                .parse()
                .with_context(|| format!("INVITATION_TTL_DAYS must be a number, got '{v}'"))?,
            Err(_) => 30,
        };

        let taxonomy_seed = env::var("TAXONOMY_SEED")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            listen_addr,
            log_level,
            log_format,
            invitation_ttl_days,
            taxonomy_seed,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - `invitation_ttl_days` is outside 1..=365
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !(1..=365).contains(&self.invitation_ttl_days) {
            anyhow::bail!(
                "INVITATION_TTL_DAYS must be between 1 and 365, got {}",
                self.invitation_ttl_days
            );
        }

        Ok(())
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Invitation TTL: {} days", self.invitation_ttl_days);

        match &self.taxonomy_seed {
            Some(path) => tracing::info!("  Taxonomy seed: {}", path.display()),
            None => tracing::info!("  Taxonomy seed: built-in"),
        }
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
