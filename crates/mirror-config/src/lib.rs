//! Configuration for embedding the resolution engine: logging setup and resolution defaults.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Once;

use mirror_types::reflect::{KeyMode, MappingMode, TypeMap, TypeSet};
use mirror_types::TypeStore;
use thiserror::Error;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;

mod schema;

pub use schema::json_schema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MirrorConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub resolve: ResolveConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level, or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// Write logs to stderr. Without this no output sink is installed.
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            // Anything else is passed through as `EnvFilter` directives.
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// The effective filter: `level` merged with `RUST_LOG` when that is set.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let config_directives = Self::normalize_level_directives(&self.level);

        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ResolveConfig {
    /// What to do with type variables that have no binding in the context: fail (`exact`) or
    /// leave them in place (`allow_incomplete`).
    #[serde(default)]
    #[schemars(schema_with = "crate::schema::mapping_mode_schema")]
    pub mode: MappingMode,

    /// Key type maps and sets by boxed type, so `int` and `Integer` are the same key.
    #[serde(default)]
    pub boxed_keys: bool,

    /// Seed new stores with the generic collection interfaces and classes.
    #[serde(default = "ResolveConfig::default_minimal_jdk")]
    pub minimal_jdk: bool,
}

impl ResolveConfig {
    fn default_minimal_jdk() -> bool {
        true
    }

    pub fn key_mode(&self) -> KeyMode {
        if self.boxed_keys {
            KeyMode::Boxed
        } else {
            KeyMode::Canonical
        }
    }

    /// A fresh declaration store.
    pub fn store(&self) -> TypeStore {
        if self.minimal_jdk {
            TypeStore::with_minimal_jdk()
        } else {
            TypeStore::default()
        }
    }

    pub fn type_map<V>(&self) -> TypeMap<V> {
        if self.boxed_keys {
            TypeMap::boxed()
        } else {
            TypeMap::new()
        }
    }

    pub fn type_set(&self) -> TypeSet {
        if self.boxed_keys {
            TypeSet::boxed()
        } else {
            TypeSet::new()
        }
    }
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            mode: MappingMode::default(),
            boxed_keys: false,
            minimal_jdk: Self::default_minimal_jdk(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` includes a source snippet; keep just the message.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl MirrorConfig {
    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber. Only the first call has an effect.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();

        let make_writer = if !config.stderr {
            BoxMakeWriter::new(std::io::sink)
        } else if cfg!(debug_assertions) {
            // Keeps `cargo test` output captured.
            BoxMakeWriter::new(tracing_subscriber::fmt::writer::TestWriter::with_stderr)
        } else {
            BoxMakeWriter::new(std::io::stderr)
        };

        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!(
                target: "mirror.config",
                level = %config.level,
                json = config.json,
                "tracing initialized"
            );
        }
    });
}
