//! Error types for schema loading and manipulation.

/// Errors raised while loading or assembling an [`Api`](crate::Api).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A shape reference names a shape that is not defined anywhere.
    #[error("absent shape {shape:?} referenced by {referenced_by:?}")]
    AbsentShape {
        /// Name of the missing shape.
        shape: String,
        /// Shape or operation holding the dangling reference.
        referenced_by: String,
    },

    /// The schema document uses a construct the loader does not understand.
    #[error("invalid schema document: {0}")]
    InvalidDocument(String),

    /// The schema document is not valid JSON or does not match the AST layout.
    #[error("failed to parse schema document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The schema file could not be read.
    #[error("failed to read schema file {path}: {source}")]
    Io {
        /// Path of the file being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Convenience result type for schema operations.
pub type ApiResult<T> = Result<T, ApiError>;
