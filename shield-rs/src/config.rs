//! Configuration for shield-rs

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{Result, StartupError};
use crate::normalizer::StemmerKind;

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "shield.toml";

/// Prefix of environment variables overriding file settings,
/// e.g. `SHIELD_ARTIFACTS__MODEL_PATH=/srv/model.json`
pub const ENV_PREFIX: &str = "SHIELD";

/// Main configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShieldConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Fitted artifact locations
    pub artifacts: ArtifactConfig,
    /// Linguistic resources for the normalizer
    #[serde(default)]
    pub language: LanguageConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listen address (e.g., "127.0.0.1:8501")
    pub listen_addr: String,
    /// Largest accepted request body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Fitted artifact locations. Both must load or startup fails.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtifactConfig {
    /// Path to the fitted vectorizer (JSON)
    pub vectorizer_path: PathBuf,
    /// Path to the fitted model (JSON)
    pub model_path: PathBuf,
}

/// Normalizer resources
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LanguageConfig {
    /// Stemming algorithm the artifacts were built with
    #[serde(default)]
    pub stemmer: StemmerKind,
    /// Replacement stopword list, one word per line. Bundled English list when unset.
    #[serde(default)]
    pub stopwords_path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Filter directive (e.g., "info", "shield_rs=debug")
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl ShieldConfig {
    /// Load configuration from a TOML file, layered over the development
    /// defaults and under `SHIELD_*` environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::layered(Some(path))
    }

    /// Resolve the configuration the binaries run with: the explicit path
    /// when given, otherwise `shield.toml` if present, otherwise defaults.
    /// Environment overrides apply in every case.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::layered(Some(path)),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::layered(Some(Path::new(DEFAULT_CONFIG_FILE)))
            }
            None => Self::layered(None),
        }
    }

    fn layered(path: Option<&Path>) -> Result<Self> {
        let defaults = config::Config::try_from(&Self::development())
            .map_err(|e| StartupError::Config(format!("Failed to build defaults: {}", e)))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            if !path.exists() {
                return Err(StartupError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::new(
                &path.to_string_lossy(),
                config::FileFormat::Toml,
            ));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| StartupError::Config(format!("Failed to read config: {}", e)))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| StartupError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Create a default development configuration
    pub fn development() -> Self {
        Self {
            server: ServerConfig {
                listen_addr: "127.0.0.1:8501".to_string(),
                max_body_bytes: default_max_body_bytes(),
            },
            artifacts: ArtifactConfig {
                vectorizer_path: PathBuf::from("artifacts/vectorizer.json"),
                model_path: PathBuf::from("artifacts/model.json"),
            },
            language: LanguageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.server.listen_addr.parse::<SocketAddr>().map_err(|e| {
            StartupError::Config(format!(
                "Invalid listen address '{}': {}",
                self.server.listen_addr, e
            ))
        })?;

        if self.server.max_body_bytes == 0 {
            return Err(StartupError::Config(
                "server.max_body_bytes must be positive".to_string(),
            ));
        }

        if self.artifacts.vectorizer_path.as_os_str().is_empty() {
            return Err(StartupError::Config("No vectorizer path configured".to_string()));
        }
        if self.artifacts.model_path.as_os_str().is_empty() {
            return Err(StartupError::Config("No model path configured".to_string()));
        }

        if self.logging.level.trim().is_empty() {
            return Err(StartupError::Config("Empty log level".to_string()));
        }

        Ok(())
    }
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self::development()
    }
}
