//! Configuration.
//!
//! Loaded from TOML (every section optional), then overridden by
//! `BLOGCHAIN_*` environment variables.

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    #[default]
    Prod,
    /// Exposes the raw chaincode service.
    Dev,
}

/// Fabric-style connection settings for the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Mirror entity writes to the ledger.
    pub enabled: bool,
    pub channel_name: String,
    pub peer_name: String,
    pub peer_url: String,
    pub event_hub_name: String,
    pub event_hub_url: String,
    pub orderer_name: String,
    pub orderer_url: String,
    pub admin_name: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            channel_name: "mychannel".into(),
            peer_name: "peer0.org1.example.com".into(),
            peer_url: "grpc://localhost:7051".into(),
            event_hub_name: "eventhub01".into(),
            event_hub_url: "grpc://localhost:7053".into(),
            orderer_name: "orderer.example.com".into(),
            orderer_url: "grpc://localhost:7050".into(),
            admin_name: "admin".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".into(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogchainConfig {
    /// Prefix of every i18n key.
    pub app_name: String,
    pub profile: Profile,
    pub ledger: LedgerConfig,
    pub log: LogConfig,
}

impl Default for BlogchainConfig {
    fn default() -> Self {
        Self {
            app_name: "blogchainApp".into(),
            profile: Profile::default(),
            ledger: LedgerConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl BlogchainConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Apply `BLOGCHAIN_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|name| env::var(name).ok())
    }

    /// Same as [`with_env_overrides`](Self::with_env_overrides) with an
    /// injectable lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let boolean = |name: &str| {
            lookup(name).and_then(|v| match v.as_str() {
                "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
                "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
                _ => None,
            })
        };

        if let Some(app_name) = string("BLOGCHAIN_APP_NAME") {
            self.app_name = app_name;
        }
        if let Some(profile) = string("BLOGCHAIN_PROFILE") {
            self.profile = match profile.as_str() {
                "dev" => Profile::Dev,
                "prod" => Profile::Prod,
                other => {
                    return Err(ConfigError::Invalid(format!("unknown profile '{other}'")));
                }
            };
        }
        if let Some(enabled) = boolean("BLOGCHAIN_LEDGER_ENABLED") {
            self.ledger.enabled = enabled;
        }
        if let Some(channel) = string("BLOGCHAIN_LEDGER_CHANNEL") {
            self.ledger.channel_name = channel;
        }
        if let Some(filter) = string("BLOGCHAIN_LOG_FILTER") {
            self.log.filter = filter;
        }
        if let Some(json) = boolean("BLOGCHAIN_LOG_JSON") {
            self.log.json = json;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app_name.trim().is_empty() {
            return Err(ConfigError::Invalid("app_name must not be empty".into()));
        }
        if self.ledger.enabled {
            let required = [
                ("ledger.channel_name", &self.ledger.channel_name),
                ("ledger.peer_name", &self.ledger.peer_name),
                ("ledger.peer_url", &self.ledger.peer_url),
                ("ledger.event_hub_name", &self.ledger.event_hub_name),
                ("ledger.event_hub_url", &self.ledger.event_hub_url),
                ("ledger.orderer_name", &self.ledger.orderer_name),
                ("ledger.orderer_url", &self.ledger.orderer_url),
                ("ledger.admin_name", &self.ledger.admin_name),
            ];
            for (name, value) in required {
                if value.trim().is_empty() {
                    return Err(ConfigError::Invalid(format!(
                        "{name} must be set when the ledger is enabled"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn is_dev(&self) -> bool {
        self.profile == Profile::Dev
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = BlogchainConfig::from_toml_str("").unwrap();
        assert_eq!(config, BlogchainConfig::default());
        assert_eq!(config.app_name, "blogchainApp");
        assert!(!config.is_dev());
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config = BlogchainConfig::from_toml_str(
            r#"
            profile = "dev"

            [ledger]
            channel_name = "blogs"
            "#,
        )
        .unwrap();

        assert!(config.is_dev());
        assert_eq!(config.ledger.channel_name, "blogs");
        assert_eq!(config.ledger.orderer_url, "grpc://localhost:7050");
        assert_eq!(config.log.filter, "info");
    }

    #[rstest]
    #[case::channel("channel_name")]
    #[case::peer_name("peer_name")]
    #[case::peer_url("peer_url")]
    #[case::event_hub_name("event_hub_name")]
    #[case::event_hub_url("event_hub_url")]
    #[case::orderer_name("orderer_name")]
    #[case::orderer_url("orderer_url")]
    #[case::admin("admin_name")]
    fn enabled_ledger_needs_every_connection_field(#[case] field: &str) {
        let raw = format!("[ledger]\n{field} = \"  \"\n");
        let err = BlogchainConfig::from_toml_str(&raw).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains(&format!("ledger.{field}")));
    }

    #[test]
    fn disabled_ledger_skips_url_checks() {
        let config = BlogchainConfig::from_toml_str(
            r#"
            [ledger]
            enabled = false
            peer_url = ""
            "#,
        );
        assert!(config.is_ok());
    }

    #[test]
    fn env_overrides_win() {
        let config = BlogchainConfig::default()
            .with_overrides(lookup(&[
                ("BLOGCHAIN_PROFILE", "dev"),
                ("BLOGCHAIN_LEDGER_ENABLED", "no"),
                ("BLOGCHAIN_LOG_JSON", "1"),
                ("BLOGCHAIN_APP_NAME", "   "),
            ]))
            .unwrap();

        assert!(config.is_dev());
        assert!(!config.ledger.enabled);
        assert!(config.log.json);
        assert_eq!(config.app_name, "blogchainApp");
    }

    #[test]
    fn unknown_profile_is_rejected() {
        let err = BlogchainConfig::default()
            .with_overrides(lookup(&[("BLOGCHAIN_PROFILE", "staging")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
