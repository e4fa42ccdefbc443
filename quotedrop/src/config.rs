//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `config.yaml` but can be specified via `-f` flag or `QUOTEDROP_CONFIG`
//! environment variable.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`, skipped if absent)
//! 2. **Environment variables** - Variables prefixed with `QUOTEDROP_` override YAML values
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `QUOTEDROP_STORAGE__UPLOAD_DIR=/var/lib/quotedrop/uploads` sets the `storage.upload_dir` field.
//!
//! ## Usage
//!
//! ```no_run
//! use clap::Parser;
//! use quotedrop::config::{Args, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let args = Args::parse();
//! let config = Config::load(&args)?;
//!
//! println!("Server will bind to {}:{}", config.host, config.port);
//! # Ok(())
//! # }
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "QUOTEDROP_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    /// Useful for CI/CD pipelines to catch config errors before deployment.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// This is the root configuration structure loaded from YAML and environment variables.
/// All fields have sensible defaults defined in the `Default` implementation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Absolute base URL this server is reachable at. Attachment links in
    /// notification emails are formed by appending an upload's public path.
    pub public_url: Url,
    /// Cross-origin access configuration for the browser frontend
    pub cors: CorsConfig,
    /// Upload directory and recipient file locations
    pub storage: StorageConfig,
    /// Outbound transactional-email settings
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Origins allowed to call the API from a browser
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory uploaded files are written to (created on startup if missing)
    pub upload_dir: PathBuf,
    /// Flat text file holding one recipient address per line (created on
    /// first append)
    pub recipients_file: PathBuf,
    /// Request body cap for `/uploadFile`
    pub max_upload_bytes: u64,
}

/// Settings for the external email delivery API.
///
/// The request shape is fixed (EmailJS-style): `service_id`, `template_id`
/// and `user_id` identify the account and template, and the per-recipient
/// `template_params` carry the sender display name and attachment URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmailConfig {
    /// Email delivery HTTP endpoint
    pub api_url: Url,
    pub service_id: String,
    pub template_id: String,
    pub user_id: String,
    /// Sender display name shown to recipients
    pub from_name: String,
    pub from_email: String,
    /// Fixed message body accompanying the attachment link
    pub message: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            public_url: Url::parse("http://localhost:5001").expect("default public_url is valid"),
            cors: CorsConfig::default(),
            storage: StorageConfig::default(),
            email: EmailConfig::default(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            recipients_file: PathBuf::from("emails.txt"),
            // Mirrors the 5MB advisory limit the browser client enforces
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse("https://api.emailjs.com/api/v1.0/email/send").expect("default api_url is valid"),
            service_id: String::new(),
            template_id: String::new(),
            user_id: String::new(),
            from_name: "Steel Quotes Team".to_string(),
            from_email: "quotes@example.com".to_string(),
            message: "Please find the steel quote attachment below.".to_string(),
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        if self.storage.upload_dir.as_os_str().is_empty() {
            return Err(Error::Internal {
                operation: "Config validation: storage.upload_dir must not be empty".to_string(),
            });
        }

        if self.storage.recipients_file.as_os_str().is_empty() {
            return Err(Error::Internal {
                operation: "Config validation: storage.recipients_file must not be empty".to_string(),
            });
        }

        if self.storage.max_upload_bytes == 0 {
            return Err(Error::Internal {
                operation: "Config validation: storage.max_upload_bytes must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("QUOTEDROP_").split("__"))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
