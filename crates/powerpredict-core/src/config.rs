use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{PowerPredictError, Result};
use crate::types::BillSettings;

/// Top-level configuration for PowerPredict.
///
/// Loaded from `~/.powerpredict/config.toml` by default. Every section falls
/// back to its defaults when missing from the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerPredictConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub billing: BillingConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

impl PowerPredictConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PowerPredictConfig = toml::from_str(&content)?;
        config.chat.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| PowerPredictError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Bill estimation defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// Settings used when a request or CLI invocation does not supply any.
    pub default_settings: BillSettings,
}

/// Chat widget timing and input limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Delay before the greeting appears after opening the chat.
    pub greeting_delay_ms: u64,
    /// Lower bound of the simulated typing delay for typed messages.
    pub typing_delay_min_ms: u64,
    /// Upper bound of the simulated typing delay for typed messages.
    pub typing_delay_max_ms: u64,
    /// Fixed typing delay after a suggestion chip is clicked.
    pub suggestion_delay_ms: u64,
    /// Maximum accepted message length in characters.
    pub max_message_length: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting_delay_ms: 500,
            typing_delay_min_ms: 1000,
            typing_delay_max_ms: 2000,
            suggestion_delay_ms: 800,
            max_message_length: 2000,
        }
    }
}

impl ChatConfig {
    /// A config with every delay set to zero. Used by tests and scripted runs.
    pub fn instant() -> Self {
        Self {
            greeting_delay_ms: 0,
            typing_delay_min_ms: 0,
            typing_delay_max_ms: 0,
            suggestion_delay_ms: 0,
            ..Self::default()
        }
    }

    /// Reject configurations whose typing delay range is inverted.
    pub fn validate(&self) -> Result<()> {
        if self.typing_delay_min_ms > self.typing_delay_max_ms {
            return Err(PowerPredictError::Config(format!(
                "chat.typing_delay_min_ms ({}) exceeds chat.typing_delay_max_ms ({})",
                self.typing_delay_min_ms, self.typing_delay_max_ms
            )));
        }
        if self.max_message_length == 0 {
            return Err(PowerPredictError::Config(
                "chat.max_message_length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Origins allowed by CORS. Empty means same-origin only.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

/// Optional LLM fallback assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Whether the fallback assistant is offered at all.
    pub enabled: bool,
    /// OpenAI-compatible chat completions endpoint.
    pub api_url: String,
    /// Model name sent with each request.
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EfficiencyRating, Season};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = PowerPredictConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.billing.default_settings.region, "National Average");
        assert_eq!(config.chat.greeting_delay_ms, 500);
        assert_eq!(config.chat.typing_delay_min_ms, 1000);
        assert_eq!(config.chat.typing_delay_max_ms, 2000);
        assert_eq!(config.chat.suggestion_delay_ms, 800);
        assert_eq!(config.server.port, 5000);
        assert!(!config.assistant.enabled);
        assert_eq!(config.assistant.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[billing.default_settings]
region = "Pacific"
use_time_of_use = true
season = "winter"
home_size = "large"
efficiency_rating = "good"

[chat]
greeting_delay_ms = 0
typing_delay_min_ms = 100
typing_delay_max_ms = 200

[server]
host = "0.0.0.0"
port = 8080
allowed_origins = []

[assistant]
enabled = true
model = "gpt-4o-mini"
timeout_secs = 5
"#;
        let file = create_temp_config(content);
        let config = PowerPredictConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        let settings = &config.billing.default_settings;
        assert_eq!(settings.region, "Pacific");
        assert!(settings.use_time_of_use);
        assert_eq!(settings.season, Season::Winter);
        assert_eq!(settings.efficiency_rating, EfficiencyRating::Good);
        assert_eq!(config.chat.typing_delay_max_ms, 200);
        // Unset fields keep their defaults
        assert_eq!(config.chat.suggestion_delay_ms, 800);
        assert_eq!(config.server.port, 8080);
        assert!(config.server.allowed_origins.is_empty());
        assert!(config.assistant.enabled);
        assert_eq!(config.assistant.model, "gpt-4o-mini");
        assert_eq!(config.assistant.timeout_secs, 5);
        assert_eq!(config.assistant.connect_timeout_secs, 10);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let file = create_temp_config("[general]\nlog_level = \"warn\"\n");
        let config = PowerPredictConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.chat.max_message_length, 2000);
    }

    #[test]
    fn test_load_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = PowerPredictConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("this is {{ not valid TOML");
        assert!(PowerPredictConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_rejects_inverted_typing_range() {
        let content = "[chat]\ntyping_delay_min_ms = 3000\ntyping_delay_max_ms = 1000\n";
        let file = create_temp_config(content);
        let err = PowerPredictConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, PowerPredictError::Config(_)));
        assert!(err.to_string().contains("typing_delay_min_ms"));
    }

    #[test]
    fn test_load_rejects_unknown_season() {
        let content = "[billing.default_settings]\nseason = \"monsoon\"\n";
        let file = create_temp_config(content);
        assert!(PowerPredictConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config =
            PowerPredictConfig::load_or_default(Path::new("/nonexistent/powerpredict.toml"));
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_save_creates_parent_dirs_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let mut config = PowerPredictConfig::default();
        config.billing.default_settings.season = Season::Fall;
        config.server.port = 6001;
        config.save(&path).unwrap();

        assert!(path.exists());
        let reloaded = PowerPredictConfig::load(&path).unwrap();
        assert_eq!(reloaded.billing.default_settings.season, Season::Fall);
        assert_eq!(reloaded.server.port, 6001);
        assert_eq!(reloaded.assistant.api_url, config.assistant.api_url);
    }

    #[test]
    fn test_instant_chat_config_is_valid() {
        let chat = ChatConfig::instant();
        assert_eq!(chat.greeting_delay_ms, 0);
        assert_eq!(chat.typing_delay_max_ms, 0);
        assert_eq!(chat.max_message_length, 2000);
        assert!(chat.validate().is_ok());
    }
}
