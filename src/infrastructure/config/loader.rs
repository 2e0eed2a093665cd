use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::{Config, TemplateSource};

/// Directory holding project configuration, created by `toolfinder init`.
pub const CONFIG_DIR: &str = ".toolfinder";

/// Prefix for environment overrides, e.g. `TOOLFINDER_RETRIEVAL__TOP_K=8`.
pub const ENV_PREFIX: &str = "TOOLFINDER_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid top_k: {0}. Must be at least 1")]
    InvalidTopK(usize),

    #[error("Invalid temperature: {0}. Must be between 0.0 and 2.0")]
    InvalidTemperature(f32),

    #[error("{0} model name cannot be empty")]
    EmptyModel(&'static str),

    #[error("Invalid embedding dimension: {0}. Must be at least 1")]
    InvalidDimension(usize),

    #[error("Invalid max_batch_size: {0}. Must be at least 1")]
    InvalidMaxBatchSize(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Catalog path cannot be empty")]
    EmptyCatalogPath,

    #[error("template.registry_url is required when template.source is http")]
    MissingRegistryUrl,

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .toolfinder/config.yaml (project config, created by init)
    /// 3. .toolfinder/local.yaml (project local overrides, optional)
    /// 4. Environment variables (TOOLFINDER_* prefix, `__` between sections)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(Path::new(CONFIG_DIR).join("config.yaml")))
            .merge(Yaml::file(Path::new(CONFIG_DIR).join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file on top of the defaults
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.catalog.path.trim().is_empty() {
            return Err(ConfigError::EmptyCatalogPath);
        }

        if config.retrieval.top_k == 0 {
            return Err(ConfigError::InvalidTopK(config.retrieval.top_k));
        }

        let temperature = config.generation.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidTemperature(temperature));
        }

        if config.generation.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel("generation"));
        }
        if config.embedding.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel("embedding"));
        }

        if config.embedding.dimension == 0 {
            return Err(ConfigError::InvalidDimension(config.embedding.dimension));
        }
        if config.embedding.max_batch_size == 0 {
            return Err(ConfigError::InvalidMaxBatchSize(config.embedding.max_batch_size));
        }

        if config.template.name.trim().is_empty() || config.template.version.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "template name and version cannot be empty".to_string(),
            ));
        }
        if config.template.source == TemplateSource::Http
            && config
                .template
                .registry_url
                .as_deref()
                .is_none_or(|url| url.trim().is_empty())
        {
            return Err(ConfigError::MissingRegistryUrl);
        }

        // Validate logging config
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::config::{EmbeddingProviderKind, GenerationProviderKind};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert_eq!(config.embedding.model, "text-embedding-3-large");
        assert!(config.generation.temperature.abs() < f32::EPSILON);
        assert_eq!(config.catalog.path, "extensions.json");
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
catalog:
  path: data/extensions.json
embedding:
  provider: hashed
  dimension: 256
generation:
  provider: anthropic
  model: claude-3-5-haiku-latest
  temperature: 0.2
retrieval:
  top_k: 6
logging:
  level: debug
  format: pretty
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.catalog.path, "data/extensions.json");
        assert_eq!(config.embedding.provider, EmbeddingProviderKind::Hashed);
        assert_eq!(config.embedding.dimension, 256);
        assert_eq!(config.embedding.model, "text-embedding-3-large");
        assert_eq!(config.generation.provider, GenerationProviderKind::Anthropic);
        assert_eq!(config.retrieval.top_k, 6);
        assert_eq!(config.logging.format, "pretty");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let yaml = "embedding:\n  provider: word2vec\n";
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_validate_zero_top_k() {
        let mut config = Config::default();
        config.retrieval.top_k = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTopK(0))
        ));
    }

    #[test]
    fn test_validate_temperature_range() {
        let mut config = Config::default();
        config.generation.temperature = 2.5;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTemperature(_))
        ));

        config.generation.temperature = -0.1;
        assert!(ConfigLoader::validate(&config).is_err());

        config.generation.temperature = 2.0;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_empty_models() {
        let mut config = Config::default();
        config.embedding.model = "  ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyModel("embedding"))
        ));
    }

    #[test]
    fn test_validate_zero_batch_size() {
        let mut config = Config::default();
        config.embedding.max_batch_size = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxBatchSize(0))
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogFormat(_))
        ));
    }

    #[test]
    fn test_validate_empty_catalog_path() {
        let mut config = Config::default();
        config.catalog.path = String::new();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyCatalogPath)
        ));
    }

    #[test]
    fn test_validate_http_source_requires_url() {
        let mut config = Config::default();
        config.template.source = TemplateSource::Http;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::MissingRegistryUrl)
        ));

        config.template.registry_url = Some("https://prompts.internal".to_string());
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_load_from_file_merges_with_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "retrieval:\n  top_k: 2\ngeneration:\n  max_tokens: 64").unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.retrieval.top_k, 2);
        assert_eq!(config.generation.max_tokens, 64);
        assert_eq!(config.generation.model, "gpt-4o-mini");
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "retrieval:\n  top_k: 0").unwrap();
        assert!(ConfigLoader::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = ConfigLoader::load_from_file("/nonexistent/toolfinder.yaml").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_env_overrides() {
        temp_env::with_vars(
            [
                ("TOOLFINDER_RETRIEVAL__TOP_K", Some("9")),
                ("TOOLFINDER_EMBEDDING__PROVIDER", Some("hashed")),
                ("TOOLFINDER_LOGGING__LEVEL", Some("warn")),
            ],
            || {
                let config = ConfigLoader::load().unwrap();
                assert_eq!(config.retrieval.top_k, 9);
                assert_eq!(config.embedding.provider, EmbeddingProviderKind::Hashed);
                assert_eq!(config.logging.level, "warn");
            },
        );
    }
}
