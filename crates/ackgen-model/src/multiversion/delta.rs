use std::collections::{BTreeMap, BTreeSet};

use ackgen_api::{Api, ShapeId, ShapeKind, ShapeRef};
use serde::Serialize;
use tracing::debug;

use super::{DiffError, DiffResult, compute_renames_delta};
use crate::field::Field;
use crate::model::Model;
use crate::resource::Resource;

/// How a field changed between two versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldChangeType {
    /// Same name, equal shape.
    Unchanged,
    /// Only in the destination version.
    Added,
    /// Only in the source version.
    Removed,
    /// Moved to another name through a rename.
    Renamed,
    /// Same name, different shape.
    ShapeChanged,
    /// A plain field became secret.
    ShapeChangedStringToSecret,
    /// A secret field became plain.
    ShapeChangedSecretToString,
}

/// One field's change between two versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDelta {
    /// Kind of change.
    pub change_type: FieldChangeType,
    /// Field in the source version; absent when added.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Field>,
    /// Field in the destination version; absent when removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<Field>,
}

impl FieldDelta {
    /// Destination field name, or the source name for removed fields.
    #[must_use]
    pub fn effective_name(&self) -> &str {
        self.destination
            .as_ref()
            .or(self.source.as_ref())
            .map_or("", |field| field.names.original.as_str())
    }
}

/// Spec and Status changes of one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDelta {
    /// Changes among Spec fields.
    pub spec_deltas: Vec<FieldDelta>,
    /// Changes among Status fields.
    pub status_deltas: Vec<FieldDelta>,
}

/// Top-level fields together with the schema their shapes live in.
#[derive(Debug, Clone, Copy)]
pub struct FieldSet<'a> {
    /// Schema of the fields' shape references.
    pub api: &'a Api,
    /// Fields keyed by name.
    pub fields: &'a BTreeMap<String, Field>,
}

impl<'a> FieldSet<'a> {
    /// `fields` of a resource in `model`.
    #[must_use]
    pub fn new(model: &'a Model, fields: &'a BTreeMap<String, Field>) -> Self {
        Self {
            api: model.api(),
            fields,
        }
    }
}

/// Classify every field of `source` and `destination`.
///
/// Fields are matched by exact name first, then through `renames` (source
/// name to destination name). Unmatched source fields are removed and
/// unmatched destination fields added. Deltas are sorted by
/// [`FieldDelta::effective_name`].
pub fn compute_field_deltas(
    source: FieldSet<'_>,
    destination: FieldSet<'_>,
    renames: &BTreeMap<String, String>,
) -> DiffResult<Vec<FieldDelta>> {
    let mut deltas = Vec::new();
    let mut matched = BTreeSet::new();

    for (name, source_field) in source.fields {
        if let Some(destination_field) = destination.fields.get(name) {
            matched.insert(name.as_str());
            deltas.push(FieldDelta {
                change_type: classify_change(source, source_field, destination, destination_field),
                source: Some(source_field.clone()),
                destination: Some(destination_field.clone()),
            });
            continue;
        }
        if let Some(renamed) = renames.get(name) {
            let inconsistent = || DiffError::InconsistentRenameTable {
                source_name: name.clone(),
                destination: renamed.clone(),
            };
            let (key, destination_field) = destination
                .fields
                .get_key_value(renamed)
                .ok_or_else(inconsistent)?;
            if destination_field.names.original != *renamed {
                return Err(inconsistent());
            }
            matched.insert(key.as_str());
            deltas.push(FieldDelta {
                change_type: FieldChangeType::Renamed,
                source: Some(source_field.clone()),
                destination: Some(destination_field.clone()),
            });
            continue;
        }
        deltas.push(FieldDelta {
            change_type: FieldChangeType::Removed,
            source: Some(source_field.clone()),
            destination: None,
        });
    }

    for (name, destination_field) in destination.fields {
        if !matched.contains(name.as_str()) {
            deltas.push(FieldDelta {
                change_type: FieldChangeType::Added,
                source: None,
                destination: Some(destination_field.clone()),
            });
        }
    }

    deltas.sort_by(|a, b| a.effective_name().cmp(b.effective_name()));
    Ok(deltas)
}

fn classify_change(
    source: FieldSet<'_>,
    source_field: &Field,
    destination: FieldSet<'_>,
    destination_field: &Field,
) -> FieldChangeType {
    match (source_field.is_secret(), destination_field.is_secret()) {
        (false, true) => return FieldChangeType::ShapeChangedStringToSecret,
        (true, false) => return FieldChangeType::ShapeChangedSecretToString,
        _ => {}
    }
    let equal = match (&source_field.shape_ref, &destination_field.shape_ref) {
        (Some(a), Some(b)) => {
            are_equal_shapes(source.api, a, destination.api, b, true, &mut BTreeSet::new())
        }
        _ => source_field.field_type == destination_field.field_type,
    };
    if equal {
        FieldChangeType::Unchanged
    } else {
        FieldChangeType::ShapeChanged
    }
}

/// Structural equality of two shapes from possibly different schemas.
///
/// Nested references must also agree on their names; only the outermost
/// pair may differ. Pairs already under comparison are taken as equal so
/// recursive shapes terminate.
fn are_equal_shapes(
    a_api: &Api,
    a: &ShapeRef,
    b_api: &Api,
    b: &ShapeRef,
    allow_name_change: bool,
    visited: &mut BTreeSet<(ShapeId, ShapeId)>,
) -> bool {
    if !allow_name_change && a.name != b.name {
        return false;
    }
    if !visited.insert((a.shape, b.shape)) {
        return true;
    }
    let (a_shape, b_shape) = (a_api.target(a), b_api.target(b));
    match (&a_shape.kind, &b_shape.kind) {
        (ShapeKind::Scalar { scalar: x }, ShapeKind::Scalar { scalar: y }) => x == y,
        (ShapeKind::Structure { members: x }, ShapeKind::Structure { members: y }) => {
            x.len() == y.len()
                && x.iter().all(|(name, x_member)| {
                    y.get(name).is_some_and(|y_member| {
                        are_equal_shapes(a_api, x_member, b_api, y_member, false, visited)
                    })
                })
        }
        (ShapeKind::List { member: x }, ShapeKind::List { member: y }) => {
            are_equal_shapes(a_api, x, b_api, y, false, visited)
        }
        (ShapeKind::Map { key: xk, value: xv }, ShapeKind::Map { key: yk, value: yv }) => {
            are_equal_shapes(a_api, xk, b_api, yk, false, visited)
                && are_equal_shapes(a_api, xv, b_api, yv, false, visited)
        }
        _ => false,
    }
}

/// Compare one resource across two models.
pub fn compute_resource_delta(
    source_model: &Model,
    source: &Resource,
    destination_model: &Model,
    destination: &Resource,
) -> DiffResult<ResourceDelta> {
    let renames = compute_renames_delta(&source.renames, &destination.renames)?;
    let delta = ResourceDelta {
        spec_deltas: compute_field_deltas(
            FieldSet::new(source_model, &source.spec_fields),
            FieldSet::new(destination_model, &destination.spec_fields),
            &renames,
        )?,
        status_deltas: compute_field_deltas(
            FieldSet::new(source_model, &source.status_fields),
            FieldSet::new(destination_model, &destination.status_fields),
            &renames,
        )?,
    };
    debug!(
        resource = %source.names.original,
        spec = delta.spec_deltas.len(),
        status = delta.status_deltas.len(),
        "computed resource delta"
    );
    Ok(delta)
}
