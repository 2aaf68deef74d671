//! Resource descriptors.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::field::Field;
use crate::names::Names;
use crate::printer::PrinterColumn;

/// Operations serving one resource, by role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceOps {
    /// Creates the resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create: Option<String>,
    /// Reads one resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_one: Option<String>,
    /// Reads many resources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_many: Option<String>,
    /// Modifies the resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<String>,
    /// Deletes the resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<String>,
    /// Reads the resource's attribute map.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get_attributes: Option<String>,
    /// Writes the resource's attribute map.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_attributes: Option<String>,
}

impl ResourceOps {
    /// Every assigned operation id, in role order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [
            &self.create,
            &self.read_one,
            &self.read_many,
            &self.update,
            &self.delete,
            &self.get_attributes,
            &self.set_attributes,
        ]
        .into_iter()
        .filter_map(|op| op.as_deref())
    }
}

/// One top-level resource of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Resource name variants.
    pub names: Names,
    /// Generated kind name.
    pub kind: String,
    /// Plural of the kind.
    pub plural: String,
    /// Operations by role.
    pub ops: ResourceOps,
    /// User-settable fields keyed by field name.
    pub spec_fields: BTreeMap<String, Field>,
    /// Server-reported fields keyed by field name.
    pub status_fields: BTreeMap<String, Field>,
    /// Every field, top-level and nested, keyed by path.
    pub fields: BTreeMap<String, Field>,
    /// Other services whose resources are referenced.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub type_imports: BTreeSet<String>,
    /// Short names of the kind.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub short_names: Vec<String>,
    /// Original member name to renamed field name, as declared on the create
    /// operation.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub renames: BTreeMap<String, String>,
    /// Path of the tag field, when the resource supports tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_path: Option<String>,
    /// Listing columns from printed fields, in configured order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub printer_columns: Vec<PrinterColumn>,
    /// List an age column.
    pub print_age_column: bool,
    /// List a sync-state column.
    pub print_synced_column: bool,
}

impl Resource {
    /// Field at `path`, matched exactly or ignoring case.
    #[must_use]
    pub fn field(&self, path: &str) -> Option<&Field> {
        self.fields.get(path).or_else(|| {
            self.fields
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(path))
                .map(|(_, field)| field)
        })
    }

    /// The tag field, when tags are supported and the field exists.
    #[must_use]
    pub fn tag_field(&self) -> Option<&Field> {
        self.tag_path.as_deref().and_then(|path| self.field(path))
    }

    /// Whether `name` is a Spec field.
    #[must_use]
    pub fn is_spec_field(&self, name: &str) -> bool {
        self.spec_fields.contains_key(name)
    }

    /// Whether `name` is a Status field.
    #[must_use]
    pub fn is_status_field(&self, name: &str) -> bool {
        self.status_fields.contains_key(name)
    }

    /// Field paths configured as immutable, sorted.
    #[must_use]
    pub fn immutable_field_paths(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, field)| field.is_immutable())
            .map(|(path, _)| path.as_str())
            .collect()
    }
}
