//! Per-operation overrides.

use serde::{Deserialize, Deserializer, Serialize};

/// Overrides for one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationConfig {
    /// Resource the operation belongs to, replacing the inferred name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    /// Additional roles the operation plays (`Create`, `ReadOne`, ...).
    /// Accepts a single string or a list.
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub operation_type: Vec<String>,
    /// Member path whose members are the real output payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_wrapper_field_path: Option<String>,
    /// Member path whose members are the real input payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_wrapper_field_path: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    })
}
