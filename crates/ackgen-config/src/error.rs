//! Error types for configuration loading and validation.

/// Errors raised while loading or validating a generator configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path of the file being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML for the configuration layout.
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document is not valid JSON for the configuration layout.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension does not name a supported format.
    #[error("unsupported config format for {path} (expected .yaml, .yml or .json)")]
    UnsupportedFormat {
        /// Offending path.
        path: String,
    },

    /// A rename block names an operation the schema does not define.
    #[error(
        "resources.{resource}.renames.operations.{operation}: operation not found in schema. available: {available}"
    )]
    UnknownRenameOperation {
        /// Resource whose renames are wrong.
        resource: String,
        /// Unknown operation.
        operation: String,
        /// Truncated list of known operations.
        available: String,
    },

    /// The ignore list names an operation the schema does not define.
    #[error("ignore.operations: operation {operation:?} not found in schema. available: {available}")]
    UnknownIgnoredOperation {
        /// Unknown operation.
        operation: String,
        /// Truncated list of known operations.
        available: String,
    },
}

/// Convenience result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
