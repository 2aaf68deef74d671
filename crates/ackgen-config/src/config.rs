//! Generator configuration document.
//!
//! [`GeneratorConfig`] mirrors the `generator.yaml` layout. Every section is
//! optional; accessors answer the questions the model builder asks and fall
//! back to "no override" when a section is absent.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::field::{CustomShape, FieldConfig, FieldIntent};
use crate::operation::OperationConfig;
use crate::resource::ResourceConfig;

/// Column attribute field columns are sorted by when none is configured.
pub const DEFAULT_PRINT_ORDER_BY: &str = "name";

/// Default field path of a resource's tag field.
pub const DEFAULT_TAG_FIELD_PATH: &str = "Tags";

/// Items excluded from generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreSpec {
    /// Operation ids treated as absent.
    pub operations: Vec<String>,
    /// Resource names that produce no resource.
    pub resource_names: Vec<String>,
    /// Shapes removed from the schema before model construction.
    pub shape_names: Vec<String>,
    /// `Shape.Member` paths removed from the schema before model construction.
    pub field_paths: Vec<String>,
}

/// Parsed generator configuration.
///
/// # Examples
///
/// ```
/// use ackgen_config::GeneratorConfig;
///
/// let config = GeneratorConfig::from_yaml_str("ignore:\n  resource_names: [Legacy]\n").unwrap();
/// assert!(config.resource_is_ignored("Legacy"));
/// assert!(!config.resource_is_ignored("Book"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Resource name to resource overrides.
    pub resources: BTreeMap<String, ResourceConfig>,
    /// Ignore lists.
    pub ignore: IgnoreSpec,
    /// Operation id to operation overrides.
    pub operations: BTreeMap<String, OperationConfig>,
    /// Identifier fields (ARN, owner account) move to common resource metadata.
    #[serde(alias = "include_ack_metadata")]
    pub include_resource_metadata: bool,
    /// Service model name, when it differs from the service package name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

impl GeneratorConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parse a JSON document.
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a configuration file, choosing the format from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&text)?,
            Some("json") => Self::from_json_str(&text)?,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.display().to_string(),
                });
            }
        };
        debug!(
            path = %path.display(),
            resources = config.resources.len(),
            operations = config.operations.len(),
            "loaded generator config"
        );
        Ok(config)
    }

    /// Overrides for `resource`.
    #[must_use]
    pub fn resource_config(&self, resource: &str) -> Option<&ResourceConfig> {
        self.resources.get(resource)
    }

    /// Whether `resource` has a configuration block, ignoring case.
    #[must_use]
    pub fn resource_is_configured(&self, resource: &str) -> bool {
        self.resources
            .keys()
            .any(|name| name.eq_ignore_ascii_case(resource))
    }

    /// Whether `resource` is on the resource ignore list.
    #[must_use]
    pub fn resource_is_ignored(&self, resource: &str) -> bool {
        self.ignore.resource_names.iter().any(|name| name == resource)
    }

    /// Whether `operation` is on the operation ignore list.
    #[must_use]
    pub fn operation_is_ignored(&self, operation: &str) -> bool {
        self.ignore.operations.iter().any(|name| name == operation)
    }

    /// Overrides for `operation`.
    #[must_use]
    pub fn operation_config(&self, operation: &str) -> Option<&OperationConfig> {
        self.operations.get(operation)
    }

    /// Configured input wrapper path of `operation`.
    #[must_use]
    pub fn input_wrapper_field_path(&self, operation: &str) -> Option<&str> {
        self.operation_config(operation)
            .and_then(|op| op.input_wrapper_field_path.as_deref())
            .filter(|path| !path.is_empty())
    }

    /// Configured output wrapper path of `operation`.
    #[must_use]
    pub fn output_wrapper_field_path(&self, operation: &str) -> Option<&str> {
        self.operation_config(operation)
            .and_then(|op| op.output_wrapper_field_path.as_deref())
            .filter(|path| !path.is_empty())
    }

    /// All field overrides of `resource`, keyed by field path.
    pub fn field_configs(&self, resource: &str) -> impl Iterator<Item = (&str, &FieldConfig)> {
        self.resource_config(resource)
            .into_iter()
            .flat_map(|config| config.fields.iter())
            .map(|(path, config)| (path.as_str(), config))
    }

    /// Field override at `path`, matching the path ignoring case.
    #[must_use]
    pub fn field_config(&self, resource: &str, path: &str) -> Option<&FieldConfig> {
        let fields = &self.resource_config(resource)?.fields;
        fields.get(path).or_else(|| {
            fields
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(path))
                .map(|(_, config)| config)
        })
    }

    /// Field name for member `original` of `operation` after configured renames.
    #[must_use]
    pub fn resource_field_name(&self, resource: &str, operation: &str, original: &str) -> String {
        self.resource_config(resource)
            .and_then(|config| config.operation_renames(operation))
            .and_then(|renames| {
                renames
                    .input_fields
                    .get(original)
                    .or_else(|| renames.output_fields.get(original))
            })
            .map_or_else(|| original.to_owned(), Clone::clone)
    }

    /// Every rename `resource` declares for the given operations.
    #[must_use]
    pub fn all_renames(&self, resource: &str, operations: &[&str]) -> BTreeMap<String, String> {
        let mut renames = BTreeMap::new();
        let Some(config) = self.resource_config(resource) else {
            return renames;
        };
        for operation in operations {
            if let Some(op_renames) = config.operation_renames(operation) {
                renames.extend(
                    op_renames
                        .input_fields
                        .iter()
                        .chain(&op_renames.output_fields)
                        .map(|(old, new)| (old.clone(), new.clone())),
                );
            }
        }
        renames
    }

    /// Whether `resource` unpacks an `Attributes` map into individual fields.
    #[must_use]
    pub fn unpacks_attributes_map(&self, resource: &str) -> bool {
        self.resource_config(resource)
            .is_some_and(|config| config.unpack_attributes_map.is_some())
    }

    /// Whether the ARN is `resource`'s primary identifier.
    #[must_use]
    pub fn is_arn_primary_key(&self, resource: &str) -> bool {
        self.resource_config(resource)
            .is_some_and(|config| config.is_arn_primary_key)
    }

    /// Short names for `resource`.
    #[must_use]
    pub fn short_names(&self, resource: &str) -> &[String] {
        self.resource_config(resource)
            .map(|config| config.short_names.as_slice())
            .unwrap_or_default()
    }

    /// Whether `resource` has no tag support.
    #[must_use]
    pub fn tags_ignored(&self, resource: &str) -> bool {
        self.resource_config(resource)
            .and_then(|config| config.tags.as_ref())
            .is_some_and(|tags| tags.ignore)
    }

    /// Field path of `resource`'s tag field.
    #[must_use]
    pub fn tag_field_path(&self, resource: &str) -> &str {
        self.resource_config(resource)
            .and_then(|config| config.tags.as_ref())
            .and_then(|tags| tags.path.as_deref())
            .unwrap_or(DEFAULT_TAG_FIELD_PATH)
    }

    /// Column attribute `resource` sorts its field columns by.
    #[must_use]
    pub fn print_order_by(&self, resource: &str) -> &str {
        self.resource_config(resource)
            .and_then(|config| config.print.as_ref())
            .and_then(|print| print.order_by.as_deref())
            .filter(|order_by| !order_by.is_empty())
            .unwrap_or(DEFAULT_PRINT_ORDER_BY)
    }

    /// Whether `resource` lists an age column.
    #[must_use]
    pub fn prints_age_column(&self, resource: &str) -> bool {
        self.resource_config(resource)
            .and_then(|config| config.print.as_ref())
            .is_some_and(|print| print.add_age_column)
    }

    /// Whether `resource` lists a sync-state column.
    #[must_use]
    pub fn prints_synced_column(&self, resource: &str) -> bool {
        self.resource_config(resource)
            .and_then(|config| config.print.as_ref())
            .and_then(|print| print.add_synced_column)
            .unwrap_or(true)
    }

    /// Every list-of/map-of shape requested by any resource's custom fields.
    #[must_use]
    pub fn custom_shapes(&self) -> Vec<CustomShape<'_>> {
        let mut shapes: Vec<CustomShape<'_>> = self
            .resources
            .values()
            .flat_map(|config| config.fields.values())
            .filter_map(|field| match field.intent() {
                FieldIntent::Custom(shape) => Some(shape),
                _ => None,
            })
            .collect();
        shapes.sort_by_key(|shape| match shape {
            CustomShape::ListOf(name) => (0, *name),
            CustomShape::MapOf(name) => (1, *name),
        });
        shapes.dedup();
        shapes
    }
}
