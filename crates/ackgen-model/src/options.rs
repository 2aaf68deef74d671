//! Model build options.
//!
//! [`ModelOptions`] carries the knobs that are not part of the generator
//! configuration document: the target API version and the suffix used to
//! resolve type-name collisions.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Default API version of generated resources.
pub const DEFAULT_API_VERSION: &str = "v1alpha1";

/// Default suffix appended to type names that collide with resource names.
pub const DEFAULT_CONFLICT_SUFFIX: &str = "_SDK";

/// Options for one model build.
///
/// # Examples
///
/// ```
/// use ackgen_model::ModelOptions;
///
/// let options = ModelOptions::builder()
///     .service_package_name("books".to_owned())
///     .build();
/// assert_eq!(options.api_version, "v1alpha1");
/// assert_eq!(options.conflict_suffix, "_SDK");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct ModelOptions {
    /// Package name of the service, used to label the model.
    #[builder(default)]
    pub service_package_name: String,

    /// API version the model is built for (e.g. `"v1alpha1"`).
    #[builder(default = String::from(DEFAULT_API_VERSION))]
    pub api_version: String,

    /// Suffix appended to type names that collide with reserved resource names.
    #[builder(default = String::from(DEFAULT_CONFLICT_SUFFIX))]
    pub conflict_suffix: String,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            service_package_name: String::new(),
            api_version: String::from(DEFAULT_API_VERSION),
            conflict_suffix: String::from(DEFAULT_CONFLICT_SUFFIX),
        }
    }
}

impl ModelOptions {
    /// Load options from environment variables, falling back to defaults.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `ACKGEN_SERVICE` | empty |
    /// | `ACKGEN_API_VERSION` | `v1alpha1` |
    /// | `ACKGEN_CONFLICT_SUFFIX` | `_SDK` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut options = Self::default();

        if let Ok(v) = std::env::var("ACKGEN_SERVICE") {
            options.service_package_name = v;
        }
        if let Ok(v) = std::env::var("ACKGEN_API_VERSION") {
            if !v.is_empty() {
                options.api_version = v;
            }
        }
        if let Ok(v) = std::env::var("ACKGEN_CONFLICT_SUFFIX") {
            if !v.is_empty() {
                options.conflict_suffix = v;
            }
        }

        options
    }
}
