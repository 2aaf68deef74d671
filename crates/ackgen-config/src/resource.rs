//! Per-resource overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field::FieldConfig;

/// Declares that a resource's `Attributes` map member stands for a set of
/// individually typed fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnpackAttributesMapConfig {
    /// The set-attributes call accepts one attribute per invocation.
    pub set_attributes_single_attribute: bool,
}

/// Field renames declared for one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationRenamesConfig {
    /// Input member name to field name.
    pub input_fields: BTreeMap<String, String>,
    /// Output member name to field name.
    pub output_fields: BTreeMap<String, String>,
}

/// Field renames declared per operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenamesConfig {
    /// Operation id to its renames.
    pub operations: BTreeMap<String, OperationRenamesConfig>,
}

/// Where a resource keeps its tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    /// The resource does not support tags.
    pub ignore: bool,
    /// Field path of the tag field, `Tags` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Member holding the tag key in a list-of-structure tag field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    /// Member holding the tag value in a list-of-structure tag field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_name: Option<String>,
}

/// Listing columns of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    /// Append a column with the object's age.
    pub add_age_column: bool,
    /// Append a column with the sync state. Defaults to on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_synced_column: Option<bool>,
    /// Column attribute used to sort field columns: `name`, `type`,
    /// `jsonpath` or `index`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
}

/// Overrides for one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Field path to field overrides. Paths may be dotted for nested fields.
    pub fields: BTreeMap<String, FieldConfig>,
    /// Per-operation member renames.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renames: Option<RenamesConfig>,
    /// Attributes-map unpacking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unpack_attributes_map: Option<UnpackAttributesMapConfig>,
    /// Short names for the generated kind.
    #[serde(alias = "shortNames", skip_serializing_if = "Vec::is_empty")]
    pub short_names: Vec<String>,
    /// The ARN is the resource's primary identifier.
    pub is_arn_primary_key: bool,
    /// Tag field layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagConfig>,
    /// Listing columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print: Option<PrintConfig>,
}

impl ResourceConfig {
    /// Renames declared for `operation`, if any.
    #[must_use]
    pub fn operation_renames(&self, operation: &str) -> Option<&OperationRenamesConfig> {
        self.renames
            .as_ref()
            .and_then(|renames| renames.operations.get(operation))
    }
}
