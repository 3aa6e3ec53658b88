use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::errors::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub gitlab: GitlabConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(".")
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Config::builder()
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/default")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/local")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Rejects configurations the service cannot start with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.telegram.token.trim().is_empty() {
            return Err(AppError::Invalid("telegram.token must not be empty"));
        }
        if self.gitlab.token.trim().is_empty() {
            return Err(AppError::Invalid("gitlab.token must not be empty"));
        }
        if self.gitlab.url.trim().is_empty() {
            return Err(AppError::Invalid("gitlab.url must not be empty"));
        }
        if !self.server.path.starts_with('/') {
            return Err(AppError::Invalid("server.path must start with '/'"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::Invalid("http.timeout_secs must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    pub token: String,
    #[serde(default = "TelegramConfig::default_api_url")]
    pub api_url: String,
}

impl TelegramConfig {
    fn default_api_url() -> String {
        "https://api.telegram.org".to_string()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitlabConfig {
    pub token: String,
    #[serde(default = "GitlabConfig::default_url")]
    pub url: String,
}

impl GitlabConfig {
    fn default_url() -> String {
        "https://gitlab.com".to_string()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_bind")]
    pub bind: String,
    /// Route the webhook is mounted on.
    #[serde(default = "ServerConfig::default_path")]
    pub path: String,
}

impl ServerConfig {
    fn default_bind() -> String {
        "0.0.0.0:8080".to_string()
    }

    fn default_path() -> String {
        "/".to_string()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: Self::default_bind(),
            path: Self::default_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "HttpConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl HttpConfig {
    const fn default_timeout_secs() -> u64 {
        10
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "ObservabilityConfig::default_metrics_path")]
    pub metrics_path: String,
}

impl ObservabilityConfig {
    fn default_metrics_path() -> String {
        "/metrics".to_string()
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_path: Self::default_metrics_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        AppConfig {
            telegram: TelegramConfig {
                token: "123:abc".into(),
                api_url: TelegramConfig::default_api_url(),
            },
            gitlab: GitlabConfig {
                token: "glpat-xyz".into(),
                url: GitlabConfig::default_url(),
            },
            server: ServerConfig::default(),
            http: HttpConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = sample();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.server.path, "/");
        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(config.gitlab.url, "https://gitlab.com");
        assert_eq!(config.observability.metrics_path, "/metrics");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_tokens() {
        let mut config = sample();
        config.telegram.token = "  ".into();
        assert!(matches!(config.validate(), Err(AppError::Invalid(_))));

        let mut config = sample();
        config.gitlab.token.clear();
        assert!(matches!(config.validate(), Err(AppError::Invalid(_))));
    }

    #[test]
    fn validate_rejects_relative_webhook_path() {
        let mut config = sample();
        config.server.path = "hooks".into();
        assert!(config.validate().is_err());
    }
}
