use serde::{Deserialize, Deserializer};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::constants::{alert, broker, env, server};
use crate::error::ConfigError;

/// Broker session id. Never printed: Debug and Display are redacted.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionCredential(String);

impl SessionCredential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// False for an empty value or the placeholder shipped in sample configs
    pub fn is_configured(&self) -> bool {
        let v = self.0.trim();
        !v.is_empty() && v != broker::SSID_PLACEHOLDER
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionCredential(***)")
    }
}

impl fmt::Display for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

impl<'de> Deserialize<'de> for SessionCredential {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self(String::deserialize(deserializer)?))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountMode {
    #[default]
    Practice,
    Real,
}

impl AccountMode {
    /// Numeric flag the broker expects in `balance_type`
    pub fn balance_type(&self) -> u8 {
        match self {
            AccountMode::Practice => broker::BALANCE_TYPE_PRACTICE,
            AccountMode::Real => broker::BALANCE_TYPE_REAL,
        }
    }
}

impl FromStr for AccountMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PRACTICE" => Ok(AccountMode::Practice),
            "REAL" => Ok(AccountMode::Real),
            other => Err(ConfigError::Invalid {
                field: "broker.account_mode",
                reason: format!("expected PRACTICE or REAL, got '{}'", other),
            }),
        }
    }
}

impl fmt::Display for AccountMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountMode::Practice => f.write_str("PRACTICE"),
            AccountMode::Real => f.write_str("REAL"),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub webhook_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: server::DEFAULT_HOST.to_string(),
            port: server::DEFAULT_PORT,
            webhook_path: server::DEFAULT_WEBHOOK_PATH.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub base_url: String,
    pub account_mode: AccountMode,
    pub ssid: SessionCredential,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            base_url: broker::DEFAULT_BASE_URL.to_string(),
            account_mode: AccountMode::Practice,
            ssid: SessionCredential::new(broker::SSID_PLACEHOLDER),
        }
    }
}

impl BrokerConfig {
    /// Base URL joined with an API path, without doubling the slash
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub default_asset: String,
    /// Amounts the alert script is expected to send. Off-ladder amounts are
    /// logged and still forwarded.
    pub martingale_levels: Vec<f64>,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            default_asset: alert::DEFAULT_ASSET.to_string(),
            martingale_levels: alert::DEFAULT_MARTINGALE_LEVELS.to_vec(),
        }
    }
}

impl SignalConfig {
    pub fn is_martingale_level(&self, amount: f64) -> bool {
        self.martingale_levels
            .iter()
            .any(|level| (level - amount).abs() < f64::EPSILON)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub broker: BrokerConfig,
    pub signal: SignalConfig,
}

impl AppConfig {
    /// Reads `.env`, the YAML file named by `RELAY_CONFIG` (default
    /// `config.yaml`, optional) and the environment overrides, then validates.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let path = std::env::var(env::CONFIG_PATH)
            .unwrap_or_else(|_| server::DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            tracing::warn!("⚠️ Config file '{}' not found, using defaults", path);
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // Strip BOM if present
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Applies environment-style overrides. `lookup` returns the value of a
    /// variable, or `None` when it is unset.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ssid) = lookup(env::SSID) {
            self.broker.ssid = SessionCredential::new(ssid);
        }
        if let Some(mode) = lookup(env::ACCOUNT_TYPE) {
            self.broker.account_mode = mode.parse()?;
        }
        if let Some(url) = lookup(env::BASE_URL) {
            self.broker.base_url = url;
        }
        if let Some(host) = lookup(env::HOST) {
            self.server.host = host;
        }
        if let Some(port) = lookup(env::PORT) {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                field: "server.port",
                reason: format!("'{}' is not a valid port", port),
            })?;
        }
        Ok(())
    }

    /// An unconfigured credential passes validation; the relay refuses each
    /// trade instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.broker.base_url).map_err(|e| ConfigError::Invalid {
            field: "broker.base_url",
            reason: format!("'{}': {}", self.broker.base_url, e),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Invalid {
                field: "broker.base_url",
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        if !self.server.webhook_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                field: "server.webhook_path",
                reason: format!("'{}' must start with '/'", self.server.webhook_path),
            });
        }
        if self.server.webhook_path == server::HEALTH_PATH {
            return Err(ConfigError::Invalid {
                field: "server.webhook_path",
                reason: format!("'{}' is reserved", server::HEALTH_PATH),
            });
        }

        if self.signal.default_asset.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "signal.default_asset",
                reason: "must not be empty".to_string(),
            });
        }

        if let Some(bad) = self
            .signal
            .martingale_levels
            .iter()
            .find(|l| !l.is_finite() || **l <= 0.0)
        {
            return Err(ConfigError::Invalid {
                field: "signal.martingale_levels",
                reason: format!("level {} must be a positive number", bad),
            });
        }

        Ok(())
    }
}
