//! Differences between API versions of the same service.
//!
//! A [`VersionManager`] holds one [`Model`](crate::Model) per API version and
//! compares resources across versions field by field, honoring the renames
//! each version's configuration declares.

mod delta;
mod manager;
mod renames;

pub use delta::{
    FieldChangeType, FieldDelta, FieldSet, ResourceDelta, compute_field_deltas, compute_resource_delta,
};
pub use manager::VersionManager;
pub use renames::compute_renames_delta;

use crate::error::ModelError;

/// Errors raised while comparing versions.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// Two different original names are renamed to the same field name.
    #[error("renames conflict: {source_original} and {destination_original} are both renamed to {target}")]
    ConflictingRename {
        /// Original name renamed in the source version.
        source_original: String,
        /// Original name renamed in the destination version.
        destination_original: String,
        /// Shared renamed field name.
        target: String,
    },

    /// The renames table names a field that one side does not have.
    #[error("renamed field {source_name} -> {destination} is not present in both versions")]
    InconsistentRenameTable {
        /// Field name in the source version.
        source_name: String,
        /// Field name in the destination version.
        destination: String,
    },

    /// No model exists for the version.
    #[error("unknown API version {version}")]
    UnknownVersion {
        /// Requested version.
        version: String,
    },

    /// A version was compared with itself.
    #[error("cannot compare API version {version} with itself")]
    SameVersion {
        /// Requested version.
        version: String,
    },

    /// Building a version's model failed.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for version comparisons.
pub type DiffResult<T> = Result<T, DiffError>;
