use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::gateway::GatewayConfig;
use crate::transport::DEFAULT_BASE_URL;

const PLACEHOLDER_API_KEY: &str = "PLACEHOLDER_OPENAI_API_KEY";

/// Main configuration structure for the studio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub studio: StudioConfig,
    pub openai: OpenAIConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioConfig {
    pub name: String,
    pub version: String,
    /// Ask for a packaging render after each generated idea
    #[serde(default = "default_true")]
    pub generate_mockups: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub chat_model: String,
    pub image_model: String,
    pub image_size: String,
    /// Deadline for a single model request
    pub request_timeout_seconds: u64,
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Config {
    /// Load configuration from file with environment variable overrides
    /// ALWAYS returns a valid config - never fails
    pub fn load() -> Self {
        let env_paths = ["../.env", ".env"];

        let mut env_loaded = false;
        for path in &env_paths {
            if dotenvy::from_path(path).is_ok() {
                tracing::info!("Loaded .env from: {}", path);
                env_loaded = true;
                break;
            }
        }

        if !env_loaded {
            tracing::warn!("No .env file found - continuing with env vars only");
        }

        let config_path =
            env::var("STUDIO_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            match fs::read_to_string(&config_path) {
                Ok(contents) => Self::from_yaml(&contents).unwrap_or_else(|e| {
                    tracing::error!(
                        "Failed to parse config file {}: {} - using defaults",
                        config_path,
                        e
                    );
                    Self::default()
                }),
                Err(e) => {
                    tracing::error!(
                        "Failed to read config file {}: {} - using defaults",
                        config_path,
                        e
                    );
                    Self::default()
                }
            }
        } else {
            tracing::warn!("Config file not found at {} - using defaults", config_path);
            Self::default()
        };

        config.apply_overrides(|key| env::var(key).ok());

        if let Err(e) = config.validate() {
            tracing::warn!("Config validation warnings: {} - continuing anyway", e);
        }

        config
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        let config = serde_yaml::from_str::<Config>(contents)?;
        tracing::info!("Loaded configuration for {}", config.studio.name);
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in `load`)
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("OPENAI_API_KEY").or_else(|| lookup("VITE_OPENAI_API_KEY")) {
            self.openai.api_key = api_key;
        }
        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            self.openai.base_url = base_url;
        }
        if let Some(model) = lookup("STUDIO_CHAT_MODEL") {
            self.openai.chat_model = model;
        }
        if let Some(model) = lookup("STUDIO_IMAGE_MODEL") {
            self.openai.image_model = model;
        }
        if let Some(size) = lookup("STUDIO_IMAGE_SIZE") {
            self.openai.image_size = size;
        }
        if let Some(timeout) = lookup("STUDIO_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.openai.request_timeout_seconds = secs;
            }
        }
        if let Some(flag) = lookup("STUDIO_GENERATE_MOCKUPS") {
            if let Ok(enabled) = flag.parse() {
                self.studio.generate_mockups = enabled;
            }
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.openai.api_key == PLACEHOLDER_API_KEY || self.openai.api_key.is_empty() {
            return Err("OPENAI_API_KEY environment variable must be set".into());
        }
        if self.openai.request_timeout_seconds == 0 {
            return Err("openai.request_timeout_seconds cannot be 0".into());
        }
        if self.openai.chat_model.is_empty() {
            return Err("openai.chat_model cannot be empty".into());
        }
        if !self.openai.base_url.starts_with("http://") && !self.openai.base_url.starts_with("https://") {
            return Err(format!("openai.base_url must be an http(s) URL, got {}", self.openai.base_url).into());
        }
        Ok(())
    }

    /// Get the request deadline as Duration
    pub fn get_request_timeout(&self) -> Duration {
        Duration::from_secs(self.openai.request_timeout_seconds.max(1))
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            chat_model: self.openai.chat_model.clone(),
            image_model: self.openai.image_model.clone(),
            image_size: self.openai.image_size.clone(),
            request_timeout: self.get_request_timeout(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            studio: StudioConfig {
                name: "fmcg-ai-studio".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                generate_mockups: true,
            },
            openai: OpenAIConfig {
                api_key: env::var("OPENAI_API_KEY").unwrap_or_else(|_| {
                    tracing::warn!("OPENAI_API_KEY not set, using placeholder");
                    PLACEHOLDER_API_KEY.to_string()
                }),
                base_url: DEFAULT_BASE_URL.to_string(),
                chat_model: "gpt-4o-mini".to_string(),
                image_model: "dall-e-3".to_string(),
                image_size: "1024x1024".to_string(),
                request_timeout_seconds: 60,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_yaml_config_parses() {
        let yaml = r#"
studio:
  name: studio-test
  version: "0.0.1"
openai:
  api_key: sk-test
  chat_model: gpt-4o-mini
  image_model: dall-e-3
  image_size: 512x512
  request_timeout_seconds: 15
"#;
        let cfg = Config::from_yaml(yaml).expect("yaml should parse");
        assert_eq!(cfg.studio.name, "studio-test");
        assert!(cfg.studio.generate_mockups);
        assert_eq!(cfg.openai.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.get_request_timeout(), Duration::from_secs(15));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_env_overrides_apply() {
        let mut cfg = Config::default();
        cfg.apply_overrides(lookup(&[
            ("VITE_OPENAI_API_KEY", "sk-browser"),
            ("STUDIO_CHAT_MODEL", "gpt-4.1-mini"),
            ("STUDIO_REQUEST_TIMEOUT_SECS", "5"),
            ("STUDIO_GENERATE_MOCKUPS", "false"),
        ]));
        assert_eq!(cfg.openai.api_key, "sk-browser");
        assert_eq!(cfg.openai.chat_model, "gpt-4.1-mini");
        assert_eq!(cfg.openai.request_timeout_seconds, 5);
        assert!(!cfg.studio.generate_mockups);

        let gw = cfg.gateway_config();
        assert_eq!(gw.chat_model, "gpt-4.1-mini");
        assert_eq!(gw.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_primary_key_wins_over_browser_key() {
        let mut cfg = Config::default();
        cfg.apply_overrides(lookup(&[
            ("OPENAI_API_KEY", "sk-server"),
            ("VITE_OPENAI_API_KEY", "sk-browser"),
        ]));
        assert_eq!(cfg.openai.api_key, "sk-server");
    }

    #[test]
    fn test_bad_timeout_override_is_ignored() {
        let mut cfg = Config::default();
        cfg.apply_overrides(lookup(&[("STUDIO_REQUEST_TIMEOUT_SECS", "soon")]));
        assert_eq!(cfg.openai.request_timeout_seconds, 60);
    }

    #[test]
    fn test_validate_flags_missing_key() {
        let mut cfg = Config::default();
        cfg.openai.api_key = String::new();
        assert!(cfg.validate().is_err());
        cfg.openai.api_key = "sk-test".to_string();
        cfg.openai.base_url = "ftp://example".to_string();
        assert!(cfg.validate().is_err());
    }
}
