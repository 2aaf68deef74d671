//! Listing columns.
//!
//! A top-level Spec or Status field whose configuration carries a `print`
//! block becomes a [`PrinterColumn`]. Only scalar fields (or collections of
//! scalars, which print their element type) can be shown.

use std::collections::BTreeMap;

use ackgen_api::ScalarKind;
use serde::Serialize;

use crate::error::{ModelError, ModelResult};
use crate::field::{Field, FieldType};

/// One column shown when listing resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterColumn {
    /// Column header.
    pub name: String,
    /// Column data type: `string`, `boolean`, `integer`, `number` or `date`.
    #[serde(rename = "type")]
    pub column_type: String,
    /// Path of the value inside the object, e.g. `.spec.name`.
    pub json_path: String,
    /// Columns above zero only show in the wide listing.
    pub priority: i32,
    /// Position when columns are ordered by index.
    pub index: i32,
}

/// Attribute field columns are sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnOrder {
    /// Column header.
    Name,
    /// Column data type.
    Type,
    /// Value path.
    JsonPath,
    /// Configured index.
    Index,
}

impl ColumnOrder {
    /// Parse a configured `order_by` value, ignoring case.
    #[must_use]
    pub fn parse(order_by: &str) -> Option<Self> {
        match order_by.to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "type" => Some(Self::Type),
            "jsonpath" => Some(Self::JsonPath),
            "index" => Some(Self::Index),
            _ => None,
        }
    }

    fn sort(self, columns: &mut [PrinterColumn]) {
        match self {
            Self::Name => columns.sort_by(|a, b| a.name.cmp(&b.name)),
            Self::Type => columns.sort_by(|a, b| a.column_type.cmp(&b.column_type)),
            Self::JsonPath => columns.sort_by(|a, b| a.json_path.cmp(&b.json_path)),
            Self::Index => columns.sort_by_key(|column| column.index),
        }
    }
}

/// Column type shown for `field_type`, if it is printable.
#[must_use]
pub fn column_type(field_type: &FieldType) -> Option<&'static str> {
    match field_type {
        FieldType::Scalar { scalar } => match scalar {
            ScalarKind::String => Some("string"),
            ScalarKind::Boolean => Some("boolean"),
            ScalarKind::Integer | ScalarKind::Long => Some("integer"),
            ScalarKind::Float | ScalarKind::Double => Some("number"),
            ScalarKind::Timestamp => Some("date"),
            ScalarKind::Blob | ScalarKind::Document => None,
        },
        FieldType::List { element } => column_type(element),
        FieldType::Map { value } => column_type(value),
        FieldType::Structure { .. } | FieldType::SecretReference | FieldType::ResourceReference => {
            None
        }
    }
}

/// Columns of `resource`, Spec fields before Status fields, stably sorted by
/// `order_by`.
pub(crate) fn printer_columns(
    resource: &str,
    order_by: &str,
    spec_fields: &BTreeMap<String, Field>,
    status_fields: &BTreeMap<String, Field>,
) -> ModelResult<Vec<PrinterColumn>> {
    let order = ColumnOrder::parse(order_by).ok_or_else(|| ModelError::UnknownColumnOrder {
        resource: resource.to_owned(),
        order_by: order_by.to_owned(),
    })?;

    let mut columns = Vec::new();
    for (prefix, fields) in [(".spec", spec_fields), (".status", status_fields)] {
        for field in fields.values() {
            let Some(print) = field.config.as_ref().and_then(|config| config.print.as_ref()) else {
                continue;
            };
            let column_type =
                column_type(&field.field_type).ok_or_else(|| ModelError::UnprintableField {
                    resource: resource.to_owned(),
                    field: field.path.clone(),
                    field_type: field.field_type.to_string(),
                })?;
            columns.push(PrinterColumn {
                name: print
                    .name
                    .clone()
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| field.names.camel.clone()),
                column_type: column_type.to_owned(),
                json_path: format!("{prefix}.{}", field.names.camel_lower),
                priority: print.priority,
                index: print.index,
            });
        }
    }
    order.sort(&mut columns);
    Ok(columns)
}
