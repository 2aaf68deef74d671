//! Per-field overrides.

use serde::{Deserialize, Serialize};

/// Where a configured field takes its shape from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFieldConfig {
    /// Operation whose input (Spec) or output (Status) holds the member.
    pub operation: String,
    /// Dotted path of the member, relative to the operation's input/output root.
    pub path: String,
}

/// A field synthesized from a list-of or map-of another shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomFieldConfig {
    /// Element shape name of a synthesized list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_of: Option<String>,
    /// Value shape name of a synthesized string-keyed map.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_of: Option<String>,
}

/// Declares that a field identifies another resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferencesConfig {
    /// Service owning the referenced resource, when it is not this one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    /// Referenced resource kind.
    pub resource: String,
    /// Path inside the referenced resource holding the identifier.
    pub path: String,
    /// Skip readiness checks on the referenced resource.
    pub skip_resource_state_validations: bool,
}

/// Shows a field as a column when listing resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintFieldConfig {
    /// Column name, replacing the field's camel-case name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Columns above zero only show in the wide listing.
    pub priority: i32,
    /// Position of the column when the resource orders columns by index.
    pub index: i32,
}

/// Overrides attached to one field path of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// The field is one of the logical fields of an unpacked attributes map.
    pub is_attribute: bool,
    /// The field is server-reported and belongs in Status.
    pub is_read_only: bool,
    /// Overrides the schema's required flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,
    /// The field is the resource's primary key.
    pub is_primary_key: bool,
    /// The field holds the resource ARN.
    pub is_arn: bool,
    /// The field holds secret material and is redacted to a secret reference.
    pub is_secret: bool,
    /// The field cannot change after creation.
    pub is_immutable: bool,
    /// Take the field's shape from another operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<SourceFieldConfig>,
    /// Synthesize the field's shape as a list-of/map-of another shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_field: Option<CustomFieldConfig>,
    /// Add a companion reference field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<ReferencesConfig>,
    /// Explicit type string, e.g. `string`, `[]string`, `map[string]*int64`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_override: Option<String>,
    /// Show the field as a listing column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print: Option<PrintFieldConfig>,
    /// Replacement serialization tag for the generated member.
    #[serde(rename = "go_tag", alias = "tag", skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Synthesized container named by a custom field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomShape<'a> {
    /// List whose element is the named shape.
    ListOf(&'a str),
    /// String-keyed map whose value is the named shape.
    MapOf(&'a str),
}

impl CustomShape<'_> {
    /// Name of the element or value shape.
    #[must_use]
    pub fn member_shape(&self) -> &str {
        match self {
            Self::ListOf(name) | Self::MapOf(name) => name,
        }
    }
}

/// How a configured field obtains its type.
///
/// Exactly one source applies to a field; when a document sets several, the
/// first of `from`, `custom_field` and `type` wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldIntent<'a> {
    /// Type comes from the schema member the field was created from.
    Inferred,
    /// Type comes from a member of another operation's input or output.
    SourcedFrom(&'a SourceFieldConfig),
    /// Type is a synthesized list or map.
    Custom(CustomShape<'a>),
    /// Type is spelled out and terminal.
    TypeOverride(&'a str),
}

impl FieldConfig {
    /// Classify where this field's type comes from.
    #[must_use]
    pub fn intent(&self) -> FieldIntent<'_> {
        if let Some(from) = &self.from {
            return FieldIntent::SourcedFrom(from);
        }
        if let Some(custom) = &self.custom_field {
            if let Some(list_of) = custom.list_of.as_deref().filter(|s| !s.is_empty()) {
                return FieldIntent::Custom(CustomShape::ListOf(list_of));
            }
            if let Some(map_of) = custom.map_of.as_deref().filter(|s| !s.is_empty()) {
                return FieldIntent::Custom(CustomShape::MapOf(map_of));
            }
        }
        if let Some(type_override) = self.type_override.as_deref() {
            return FieldIntent::TypeOverride(type_override);
        }
        FieldIntent::Inferred
    }

    /// Whether a companion reference field is requested.
    #[must_use]
    pub fn has_reference(&self) -> bool {
        self.references.is_some()
    }
}
