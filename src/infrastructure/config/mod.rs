//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;

/// Host configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FrameworkSettings {
    pub bot: BotConfig,
    pub modules: ModulesConfig,
    /// Enables command hot reload
    #[serde(default)]
    pub development: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
    pub default_language: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModulesConfig {
    pub directory: PathBuf,
}

impl Default for FrameworkSettings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "bot-host".to_string(),
                prefix: "/".to_string(),
                default_language: "en".to_string(),
            },
            modules: ModulesConfig {
                directory: PathBuf::from("./modules"),
            },
            development: false,
        }
    }
}

impl FrameworkSettings {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        let settings: Self = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load_env() -> Self {
        Self::default().apply_env()
    }

    /// Overlay environment variables on top of the loaded values
    pub fn apply_env(mut self) -> Self {
        if let Ok(dir) = std::env::var("BOT_MODULES_DIR") {
            self.modules.directory = PathBuf::from(dir);
        }

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }

        if let Ok(language) = std::env::var("BOT_LANGUAGE") {
            self.bot.default_language = language;
        }

        if debug_enabled() {
            self.development = true;
        }

        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.prefix.is_empty() {
            return Err(ConfigError::InvalidValue("bot.prefix must not be empty".to_string()));
        }
        if self.bot.default_language.is_empty() {
            return Err(ConfigError::MissingField("bot.default-language".to_string()));
        }
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.development
    }
}

/// Whether `DEBUG` is set to a non-empty value
pub fn debug_enabled() -> bool {
    std::env::var_os("DEBUG").map(|v| is_set(&v)).unwrap_or(false)
}

fn is_set(value: &std::ffi::OsStr) -> bool {
    !value.is_empty()
}
