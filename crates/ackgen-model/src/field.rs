//! Resource fields.
//!
//! A [`Field`] is one node of a resource's field tree. Top-level fields are
//! keyed by their (renamed) schema member name; nested fields are addressed
//! by path, where `.` separates structure members and `..` marks a list
//! element or map value boundary (`Users..Password`).

use std::collections::BTreeMap;
use std::fmt;

use ackgen_api::{ScalarKind, ShapeId, ShapeKind, ShapeRef};
use ackgen_config::{FieldConfig, GeneratorConfig};
use serde::Serialize;

use crate::error::{ModelError, ModelResult};
use crate::names::Names;
use crate::sdk::SdkApi;

/// Generated type of a field or attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldType {
    /// A scalar.
    Scalar {
        /// Scalar subtype.
        scalar: ScalarKind,
    },
    /// A named type definition.
    Structure {
        /// Type definition name, including any conflict suffix.
        name: String,
    },
    /// A list.
    List {
        /// Element type.
        element: Box<FieldType>,
    },
    /// A string-keyed map.
    Map {
        /// Value type.
        value: Box<FieldType>,
    },
    /// Secret material, redacted to a reference to a stored secret.
    SecretReference,
    /// Reference to another resource.
    ResourceReference,
}

impl FieldType {
    /// Plain string scalar.
    #[must_use]
    pub fn string() -> Self {
        Self::Scalar {
            scalar: ScalarKind::String,
        }
    }

    /// Whether the type is a secret reference.
    #[must_use]
    pub fn is_secret(&self) -> bool {
        matches!(self, Self::SecretReference)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar { scalar } => f.write_str(scalar.as_str()),
            Self::Structure { name } => f.write_str(name),
            Self::List { element } => write!(f, "[]{element}"),
            Self::Map { value } => write!(f, "map[string]{value}"),
            Self::SecretReference => f.write_str("SecretKeyReference"),
            Self::ResourceReference => f.write_str("ResourceReference"),
        }
    }
}

/// One field of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Full path from the resource root.
    pub path: String,
    /// Name variants of the field's own (last) segment.
    pub names: Names,
    /// Generated type.
    pub field_type: FieldType,
    /// Schema reference the field was built from.
    ///
    /// Absent only for fields whose configuration declares the type
    /// (unpacked attributes and generated reference fields).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_ref: Option<ShapeRef>,
    /// Configuration attached at exactly this path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<FieldConfig>,
    /// Whether the field must be set.
    pub is_required: bool,
    /// Nested fields keyed by path.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub member_fields: BTreeMap<String, Field>,
}

impl Field {
    /// Whether the field holds secret material.
    #[must_use]
    pub fn is_secret(&self) -> bool {
        self.field_type.is_secret()
    }

    /// Whether the field cannot change after creation.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        self.config.as_ref().is_some_and(|c| c.is_immutable)
    }

    /// Whether the field is server-reported.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.config.as_ref().is_some_and(|c| c.is_read_only)
    }

    /// Whether a companion reference field is generated for this field.
    #[must_use]
    pub fn has_reference(&self) -> bool {
        self.config.as_ref().is_some_and(FieldConfig::has_reference)
    }

    /// Whether this is a generated reference field.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        match &self.field_type {
            FieldType::ResourceReference => true,
            FieldType::List { element } => **element == FieldType::ResourceReference,
            _ => false,
        }
    }

    /// Replacement serialization tag, if configured.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.config.as_ref().and_then(|c| c.tag.as_deref())
    }

    /// Whether the schema shape behind the field is a list.
    pub(crate) fn is_list(&self, sdk: &SdkApi) -> bool {
        self.shape_ref
            .as_ref()
            .is_some_and(|r| matches!(sdk.api().target(r).kind, ShapeKind::List { .. }))
    }
}

/// Identifier suffixes stripped when naming a reference field, longest
/// spellings first within each family.
const IDENTIFIER_SUFFIXES: &[&str] = &[
    "ids", "Ids", "IDs", "IDS", "id", "Id", "ID", "Names", "NAMEs", "NAMES", "Name", "NAME",
    "Arns", "ARNs", "ARNS", "Arn", "ARN",
];

/// Name of the reference field generated for the field named `original`.
///
/// The identifier suffix is stripped and `Ref` appended, or `Refs` with the
/// stem singularized when the field is a list (`SubnetIDs` becomes
/// `SubnetRefs`). Returns `None` when nothing is left after stripping.
#[must_use]
pub fn reference_field_name(original: &str, is_list: bool) -> Option<String> {
    let stem = IDENTIFIER_SUFFIXES
        .iter()
        .find_map(|suffix| original.strip_suffix(suffix))
        .unwrap_or(original);
    if stem.is_empty() {
        return None;
    }
    Some(if is_list {
        format!("{}Refs", crate::inflect::singularize(stem))
    } else {
        format!("{stem}Ref")
    })
}

/// Builds field trees for one resource.
pub(crate) struct FieldFactory<'a> {
    pub(crate) sdk: &'a SdkApi,
    pub(crate) config: &'a GeneratorConfig,
    pub(crate) resource: &'a str,
}

impl FieldFactory<'_> {
    /// Build the field at `path` and every nested field below it.
    ///
    /// Each built field, including the one returned, is also recorded in
    /// `flat` under its path.
    pub(crate) fn build(
        &self,
        path: String,
        names: Names,
        shape_ref: Option<ShapeRef>,
        config: Option<FieldConfig>,
        is_required: bool,
        flat: &mut BTreeMap<String, Field>,
    ) -> ModelResult<Field> {
        let mut ancestors = Vec::new();
        self.build_recurse(path, names, shape_ref, config, is_required, &mut ancestors, flat)
    }

    #[allow(clippy::too_many_arguments)]
    fn build_recurse(
        &self,
        path: String,
        names: Names,
        shape_ref: Option<ShapeRef>,
        config: Option<FieldConfig>,
        is_required: bool,
        ancestors: &mut Vec<ShapeId>,
        flat: &mut BTreeMap<String, Field>,
    ) -> ModelResult<Field> {
        let type_override = config.as_ref().and_then(|c| c.type_override.as_deref());
        let terminal = type_override.is_some();
        let shape_ref = match type_override {
            Some(type_string) => Some(self.sdk.type_override_ref(type_string)?),
            None => shape_ref,
        };
        let is_required = config
            .as_ref()
            .and_then(|c| c.is_required)
            .unwrap_or(is_required);

        let mut field_type = shape_ref
            .as_ref()
            .map_or_else(FieldType::string, |r| self.sdk.field_type(r));
        if config.as_ref().is_some_and(|c| c.is_secret) {
            field_type = FieldType::SecretReference;
        }

        let mut member_fields = BTreeMap::new();
        if let Some(shape_ref) = shape_ref.as_ref().filter(|_| !terminal) {
            let api = self.sdk.api();
            let container = api.container_ref(shape_ref);
            let separator = if container == shape_ref { "." } else { ".." };
            let shape = api.target(container);
            if let Some(members) = shape.members() {
                if members.is_empty() {
                    return Err(ModelError::AmbiguousStructureShape {
                        resource: self.resource.to_owned(),
                        field: path,
                        shape: shape.name.clone(),
                    });
                }
                if ancestors.contains(&container.shape) {
                    return Err(ModelError::CyclicSchema {
                        resource: self.resource.to_owned(),
                        field: path,
                        shape: shape.name.clone(),
                    });
                }
                ancestors.push(container.shape);
                for (member_name, member_ref) in members {
                    let member_names = Names::new(member_name);
                    let member_path = format!("{path}{separator}{}", member_names.camel);
                    let member_config = self
                        .config
                        .field_config(self.resource, &member_path)
                        .cloned();
                    let member = self.build_recurse(
                        member_path.clone(),
                        member_names,
                        Some(member_ref.clone()),
                        member_config,
                        shape.required.contains(member_name),
                        ancestors,
                        flat,
                    )?;
                    member_fields.insert(member_path, member);
                }
                ancestors.pop();
            }
        }

        let field = Field {
            path,
            names,
            field_type,
            shape_ref,
            config,
            is_required,
            member_fields,
        };
        flat.insert(field.path.clone(), field.clone());
        Ok(field)
    }
}
