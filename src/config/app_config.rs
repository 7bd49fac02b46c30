use serde::Deserialize;

use crate::domain::knowledge_base::KnowledgeBaseConfig;
use crate::domain::query_cache::QueryCacheConfig;
use crate::domain::DomainError;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub cache: QueryCacheConfig,
    #[serde(default)]
    pub knowledge_base: KnowledgeBaseConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    /// Falls back to the `OPENAI_API_KEY` environment variable
    #[serde(default)]
    pub openai_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
}

/// Chat model settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f32,
    /// Root of the OpenAI-compatible API
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            base_url: "https://api.openai.com".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;

        let non_blank = |key: &String| !key.trim().is_empty();
        app_config.openai_api_key = app_config
            .openai_api_key
            .take()
            .filter(non_blank)
            .or_else(|| std::env::var("OPENAI_API_KEY").ok().filter(non_blank));

        Ok(app_config)
    }

    /// The API key, or a configuration error naming how to provide it
    pub fn require_api_key(&self) -> Result<&str, DomainError> {
        self.openai_api_key.as_deref().ok_or_else(|| {
            DomainError::configuration(
                "OpenAI API key not found. Set OPENAI_API_KEY or APP__OPENAI_API_KEY",
            )
        })
    }

    /// Check every section that can be checked without network access
    pub fn validate(&self) -> Result<(), DomainError> {
        self.cache.validate()?;
        self.knowledge_base.validate()?;

        if self.llm.model.trim().is_empty() {
            return Err(DomainError::configuration("llm.model must not be empty"));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(DomainError::configuration(format!(
                "llm.temperature must be within [0, 2], got {}",
                self.llm.temperature
            )));
        }

        Ok(())
    }
}
