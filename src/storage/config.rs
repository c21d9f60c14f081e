//! Application configuration.
//!
//! Loaded from `config.toml` in the data directory; every section is optional
//! and falls back to defaults. A few deployment values can be overridden from
//! the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::i18n::DEFAULT_LOCALE;

/// Address that receives lead notifications unless configured otherwise.
pub const DEFAULT_LEAD_RECIPIENT: &str = "matheus.rodrigues@humana.ai";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// HTTP server settings
    pub server: ServerSettings,
    /// Locale settings
    pub i18n: I18nSettings,
    /// Lead notification settings
    pub mail: MailSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            server: ServerSettings::default(),
            i18n: I18nSettings::default(),
            mail: MailSettings::default(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Locale settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nSettings {
    /// Locale used for server rendering and as the detection fallback
    pub default_locale: String,
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

/// Lead notification settings.
///
/// Delivery uses SMTP when configured, then the HTTP relay. With neither,
/// startup fails unless `log_only` is set for development.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    /// Fixed recipient of lead notifications
    pub recipient: String,
    /// Sender address; falls back to the SMTP user, then the recipient
    pub from: Option<String>,
    /// SMTP server
    pub smtp: Option<SmtpSettings>,
    /// HTTP mail relay endpoint
    pub relay_url: Option<String>,
    /// Bearer token for the relay
    pub relay_token: Option<String>,
    /// Only log notifications (development)
    pub log_only: bool,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            recipient: DEFAULT_LEAD_RECIPIENT.to_string(),
            from: None,
            smtp: None,
            relay_url: None,
            relay_token: None,
            log_only: false,
        }
    }
}

impl MailSettings {
    /// Effective sender address.
    pub fn sender(&self) -> &str {
        self.from
            .as_deref()
            .or_else(|| self.smtp.as_ref().and_then(|smtp| smtp.user.as_deref()))
            .unwrap_or(&self.recipient)
    }
}

/// SMTP connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// Implicit TLS (usually port 465); otherwise STARTTLS when offered
    pub secure: bool,
    pub user: Option<String>,
    pub pass: Option<String>,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 587,
            secure: false,
            user: None,
            pass: None,
        }
    }
}

impl AppConfig {
    /// Apply overrides from a variable lookup (normally the process environment).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup("LANDING_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid LANDING_PORT: {}", port),
            }
        }

        if let Some(host) = lookup("SMTP_HOST") {
            self.mail.smtp.get_or_insert_with(SmtpSettings::default).host = host;
        }
        if let Some(smtp) = self.mail.smtp.as_mut() {
            if let Some(port) = lookup("SMTP_PORT") {
                match port.parse() {
                    Ok(port) => smtp.port = port,
                    Err(_) => tracing::warn!("Ignoring invalid SMTP_PORT: {}", port),
                }
            }
            if let Some(secure) = lookup("SMTP_SECURE") {
                smtp.secure = secure == "true";
            }
            if let Some(user) = lookup("SMTP_USER") {
                smtp.user = Some(user);
            }
            if let Some(pass) = lookup("SMTP_PASS") {
                smtp.pass = Some(pass);
            }
        }

        if let Some(from) = lookup("MAIL_FROM") {
            self.mail.from = Some(from);
        }
        if let Some(url) = lookup("MAIL_RELAY_URL") {
            self.mail.relay_url = Some(url);
        }
        if let Some(token) = lookup("MAIL_RELAY_TOKEN") {
            self.mail.relay_token = Some(token);
        }
        if let Some(flag) = lookup("MAIL_LOG_ONLY") {
            self.mail.log_only = matches!(flag.as_str(), "1" | "true");
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("ai", "humana", "LivroLanding")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from the default location.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let mut config = load_config_from(&get_config_path())?;
    config.data_dir = get_data_dir();
    Ok(config)
}

/// Load application configuration from `path`, or defaults if it does not exist.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Save application configuration to the default location.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path())
}

/// Save application configuration to `path`.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
