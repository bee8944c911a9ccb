use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "SHELF_ENV";
const CONFIG_DIR_ENV: &str = "SHELF_CONFIG_DIR";
const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl Environment {
    fn parse(value: &str) -> anyhow::Result<Self> {
        match value {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub assist: AssistSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay and `SHELF_*` vars.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let environment = Environment::parse(&environment)?;

        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .with_context(|| "unable to resolve current directory")?
                .join("config"),
        };

        let mut settings = Self::from_dir(&config_dir, &environment)?;
        settings.environment = environment;

        settings
            .assist
            .fill_missing_key(std::env::var(OPENAI_KEY_ENV).ok());

        Ok(settings)
    }

    /// Build settings from `base.toml` and `{environment}.toml` in `config_dir`, then env vars.
    pub fn from_dir(config_dir: &std::path::Path, environment: &Environment) -> anyhow::Result<Self> {
        let base_path = config_dir.join("base.toml");
        let environment_filename = match environment {
            Environment::Local => "local.toml",
            Environment::Staging => "staging.toml",
            Environment::Production => "production.toml",
        };
        let environment_path = config_dir.join(environment_filename);

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix("SHELF")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        cfg.try_deserialize()
            .with_context(|| "failed to deserialize configuration")
    }

    /// Settings rendered for display, with secrets masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.assist.api_key.is_some() {
            copy.assist.api_key = Some("***".to_string());
        }
        copy
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_request_timeout_ms() -> u64 {
        30000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

/// Backing store selection.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct StoreSettings {
    #[serde(default)]
    pub kind: StoreKind,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default = "TelemetrySettings::default_log_level")]
    pub log_level: String,
}

impl TelemetrySettings {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            log_level: Self::default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Connection details for the OpenAI-compatible assist endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssistSettings {
    #[serde(default = "AssistSettings::default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "AssistSettings::default_model")]
    pub model: String,
    #[serde(default = "AssistSettings::default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl AssistSettings {
    fn default_base_url() -> String {
        "https://api.openai.com/v1".to_string()
    }

    fn default_model() -> String {
        "gpt-3.5-turbo".to_string()
    }

    fn default_timeout_seconds() -> u64 {
        60
    }

    /// Assist is only wired in when a key is available.
    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    /// Use `fallback` when no usable key is configured. Blank keys count as missing.
    fn fill_missing_key(&mut self, fallback: Option<String>) {
        if self.is_configured() {
            return;
        }
        self.api_key = fallback.filter(|key| !key.trim().is_empty());
    }
}

impl Default for AssistSettings {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            api_key: None,
            model: Self::default_model(),
            timeout_seconds: Self::default_timeout_seconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_api_key_takes_the_fallback() {
        let mut assist = AssistSettings {
            api_key: Some(String::new()),
            ..AssistSettings::default()
        };
        assist.fill_missing_key(Some("sk-fallback".to_string()));
        assert!(assist.is_configured());
        assert_eq!(assist.api_key.as_deref(), Some("sk-fallback"));

        let mut assist = AssistSettings {
            api_key: Some("sk-configured".to_string()),
            ..AssistSettings::default()
        };
        assist.fill_missing_key(Some("sk-fallback".to_string()));
        assert_eq!(assist.api_key.as_deref(), Some("sk-configured"));

        let mut assist = AssistSettings {
            api_key: Some("  ".to_string()),
            ..AssistSettings::default()
        };
        assist.fill_missing_key(None);
        assert!(!assist.is_configured());
    }

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_store_is_memory() {
        let settings = Settings::default();
        assert_eq!(settings.store.kind, StoreKind::Memory);
    }

    #[test]
    fn assist_without_key_is_not_configured() {
        let mut assist = AssistSettings::default();
        assert!(!assist.is_configured());

        assist.api_key = Some(String::new());
        assert!(!assist.is_configured());

        assist.api_key = Some("sk-test".to_string());
        assert!(assist.is_configured());
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let err = Environment::parse("qa").unwrap_err();
        assert!(err.to_string().contains("unsupported environment 'qa'"));
    }

    #[test]
    fn redacted_masks_api_key() {
        let mut settings = Settings::default();
        settings.assist.api_key = Some("sk-secret".to_string());

        let shown = settings.redacted();
        assert_eq!(shown.assist.api_key.as_deref(), Some("***"));
        assert_eq!(settings.assist.api_key.as_deref(), Some("sk-secret"));
    }

    #[test]
    fn files_are_layered_base_then_environment() {
        let dir = std::env::temp_dir().join(format!("shelf-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("base.toml"),
            "[server]\nport = 9001\nhost = \"127.0.0.1\"\n[assist]\nmodel = \"base-model\"\n",
        )
        .unwrap();
        std::fs::write(dir.join("staging.toml"), "[server]\nport = 9002\n").unwrap();

        let settings = Settings::from_dir(&dir, &Environment::Staging).unwrap();
        assert_eq!(settings.server.port, 9002);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.assist.model, "base-model");
        assert_eq!(settings.telemetry.log_format, LogFormat::Pretty);

        std::fs::remove_dir_all(&dir).ok();
    }
}
