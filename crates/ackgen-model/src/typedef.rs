//! Type definition registry.
//!
//! One [`TypeDef`] is registered per distinct structure shape reachable from
//! any resource's fields. Nested field overrides (secret, reference, tag,
//! immutability, explicit type) are projected onto the owning type's
//! [`Attr`] so every field sharing that structure observes them.

use std::collections::{BTreeMap, BTreeSet};

use ackgen_api::{FieldPath, ShapeId, ShapeKind, ShapeRef};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ModelError, ModelResult};
use crate::field::{Field, FieldType, reference_field_name};
use crate::names::Names;
use crate::resource::Resource;
use crate::sdk::SdkApi;

/// One member of a type definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attr {
    /// Member name variants.
    pub names: Names,
    /// Generated type.
    pub field_type: FieldType,
    /// Schema reference of the member; absent for generated reference attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_ref: Option<ShapeRef>,
    /// Replacement serialization tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Whether the member cannot change after creation.
    pub is_immutable: bool,
}

/// A named type generated for one structure shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDef {
    /// Generated name, including any conflict suffix.
    pub name: String,
    /// Name variants of the structure shape.
    pub names: Names,
    /// The structure shape.
    pub shape: ShapeId,
    /// Attributes keyed by member name.
    pub attrs: BTreeMap<String, Attr>,
}

impl TypeDef {
    /// Attribute for member `name`, matched exactly, by camel name, or ignoring case.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&Attr> {
        self.attr_key(name).and_then(|key| self.attrs.get(&key))
    }

    fn attr_key(&self, name: &str) -> Option<String> {
        if self.attrs.contains_key(name) {
            return Some(name.to_owned());
        }
        self.attrs
            .iter()
            .find(|(key, attr)| attr.names.camel == name || key.eq_ignore_ascii_case(name))
            .map(|(key, _)| key.clone())
    }
}

/// Enum definition for a string shape with a closed value set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDef {
    /// Generated name, including any conflict suffix.
    pub name: String,
    /// Name variants of the enum shape.
    pub names: Names,
    /// Allowed values.
    pub values: Vec<EnumValue>,
}

/// One allowed value of an enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    /// Value as sent on the wire.
    pub original: String,
    /// Identifier-safe spelling.
    pub clean: String,
}

/// Every enum shape in the schema, sorted by generated name.
#[must_use]
pub fn enum_defs(sdk: &SdkApi) -> Vec<EnumDef> {
    let mut defs: Vec<EnumDef> = sdk
        .api()
        .shapes()
        .filter(|(_, shape)| shape.is_enum)
        .map(|(_, shape)| EnumDef {
            name: sdk.type_name(&shape.name),
            names: Names::new(&shape.name),
            values: shape
                .enum_values
                .iter()
                .map(|value| EnumValue {
                    original: value.clone(),
                    clean: Names::new(value).camel,
                })
                .collect(),
        })
        .collect();
    defs.sort_by(|a, b| a.name.cmp(&b.name));
    defs
}

/// Type definitions of one model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TypeRegistry {
    defs: Vec<TypeDef>,
    #[serde(skip)]
    by_shape: BTreeMap<ShapeId, usize>,
    #[serde(skip)]
    by_name: BTreeMap<String, usize>,
}

impl TypeRegistry {
    /// Register every non-empty, non-exception structure reachable from the
    /// fields of `resources`.
    #[must_use]
    pub fn collect(sdk: &SdkApi, resources: &[Resource]) -> Self {
        let api = sdk.api();
        let mut stack: Vec<ShapeId> = resources
            .iter()
            .flat_map(|resource| resource.fields.values())
            .filter_map(|field| field.shape_ref.as_ref().map(|r| r.shape))
            .collect();
        let mut seen = BTreeSet::new();
        let mut defs = Vec::new();

        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let shape = api.shape(id);
            match &shape.kind {
                ShapeKind::Structure { members } => {
                    stack.extend(members.values().map(|member| member.shape));
                    if shape.is_exception || members.is_empty() {
                        continue;
                    }
                    let attrs = members
                        .iter()
                        .map(|(member_name, member_ref)| {
                            let attr = Attr {
                                names: Names::new(member_name),
                                field_type: sdk.field_type(member_ref),
                                shape_ref: Some(member_ref.clone()),
                                tag: None,
                                is_immutable: false,
                            };
                            (member_name.clone(), attr)
                        })
                        .collect();
                    defs.push(TypeDef {
                        name: sdk.type_name(&shape.name),
                        names: Names::new(&shape.name),
                        shape: id,
                        attrs,
                    });
                }
                ShapeKind::List { member } => stack.push(member.shape),
                ShapeKind::Map { key, value } => stack.extend([key.shape, value.shape]),
                ShapeKind::Scalar { .. } => {}
            }
        }

        defs.sort_by(|a, b| a.name.cmp(&b.name).then(a.shape.cmp(&b.shape)));
        let mut registry = Self::default();
        for def in defs {
            if registry.by_name.contains_key(&def.name) {
                warn!(type_name = %def.name, shape = def.shape.index(), "duplicate type name, keeping first");
                continue;
            }
            let index = registry.defs.len();
            registry.by_shape.insert(def.shape, index);
            registry.by_name.insert(def.name.clone(), index);
            registry.defs.push(def);
        }
        debug!(count = registry.defs.len(), "registered type definitions");
        registry
    }

    /// All type definitions, sorted by name.
    #[must_use]
    pub fn type_defs(&self) -> &[TypeDef] {
        &self.defs
    }

    /// Type definition named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.by_name.get(name).map(|&index| &self.defs[index])
    }

    /// Type definition registered for the structure `shape`.
    #[must_use]
    pub fn by_shape(&self, shape: ShapeId) -> Option<&TypeDef> {
        self.by_shape.get(&shape).map(|&index| &self.defs[index])
    }

    /// Project every nested field override of `resource` onto the owning
    /// type definitions.
    pub fn propagate(&mut self, sdk: &SdkApi, resource: &Resource) -> ModelResult<()> {
        let resource_name = resource.names.original.as_str();
        for (path, field) in &resource.fields {
            let Some(config) = field.config.as_ref() else {
                continue;
            };
            let field_path = FieldPath::parse(path);
            if field_path.size() < 2 {
                continue;
            }
            let wants_type = config.is_secret || config.type_override.is_some();
            if !(wants_type || config.tag.is_some() || config.is_immutable || config.has_reference())
            {
                continue;
            }

            let index = self.owner_of(sdk, resource, &field_path)?;
            let member = field_path.back();
            let def = &mut self.defs[index];
            let key = def.attr_key(member).ok_or_else(|| ModelError::MissingAttribute {
                resource: resource_name.to_owned(),
                field: path.clone(),
                type_name: def.name.clone(),
                attribute: member.to_owned(),
            })?;

            if config.has_reference() {
                let reference = reference_attr(sdk, resource_name, path, &key, field)?;
                def.attrs.insert(reference.names.original.clone(), reference);
            }
            let Some(attr) = def.attrs.get_mut(&key) else {
                continue;
            };
            if wants_type {
                attr.field_type = field.field_type.clone();
                if config.type_override.is_some() {
                    attr.shape_ref.clone_from(&field.shape_ref);
                }
            }
            if let Some(tag) = &config.tag {
                attr.tag = Some(tag.clone());
            }
            if config.is_immutable {
                attr.is_immutable = true;
            }
            debug!(resource = resource_name, field = %path, type_name = %def.name, "propagated field override");
        }
        Ok(())
    }

    /// Index of the type definition owning the last segment of `path`.
    fn owner_of(&self, sdk: &SdkApi, resource: &Resource, path: &FieldPath) -> ModelResult<usize> {
        let api = sdk.api();
        let missing_parent = || ModelError::MissingParentField {
            resource: resource.names.original.clone(),
            field: path.to_string(),
        };

        let top = resource.field(path.front()).ok_or_else(missing_parent)?;
        let mut current = top.shape_ref.as_ref().ok_or_else(missing_parent)?;
        for segment in &path.parts()[1..path.size() - 1] {
            if segment.is_empty() {
                continue;
            }
            let container = api.container_ref(current);
            current = api
                .target(container)
                .member_ignore_case(segment)
                .map(|(_, member)| member)
                .ok_or_else(missing_parent)?;
        }

        let parent = api.container_ref(current);
        let parent_shape = api.shape(parent.shape);
        let by_name = |name: &str| self.by_name.get(&sdk.type_name(name)).copied();
        self.by_shape
            .get(&parent.shape)
            .copied()
            .or_else(|| by_name(&parent_shape.name))
            .or_else(|| current.name.strip_suffix("List").and_then(by_name))
            .ok_or_else(|| ModelError::MissingTypeDefinition {
                resource: resource.names.original.clone(),
                field: path.to_string(),
                type_name: sdk.type_name(&parent_shape.name),
            })
    }
}

fn reference_attr(
    sdk: &SdkApi,
    resource: &str,
    path: &str,
    member: &str,
    field: &Field,
) -> ModelResult<Attr> {
    let is_list = field.is_list(sdk);
    let name = reference_field_name(member, is_list).ok_or_else(|| ModelError::InvalidReferenceField {
        resource: resource.to_owned(),
        field: path.to_owned(),
    })?;
    let field_type = if is_list {
        FieldType::List {
            element: Box::new(FieldType::ResourceReference),
        }
    } else {
        FieldType::ResourceReference
    };
    Ok(Attr {
        names: Names::new(&name),
        field_type,
        shape_ref: None,
        tag: None,
        is_immutable: false,
    })
}
