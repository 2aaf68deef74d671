//! Resource builder.
//!
//! Resources are built in three passes so that schema mutation happens in a
//! single, well-defined place:
//!
//! 1. [`draft_resource`] picks the top-level Spec and Status members of every
//!    resource from its operations and configuration.
//! 2. [`attach_custom_nested_fields`] injects configured dotted fields into
//!    their parent structure shapes.
//! 3. [`finish_resource`] materializes the nested field trees and generated
//!    reference fields.

use std::collections::BTreeMap;

use ackgen_api::{FieldPath, ShapeKind, ShapeRef};
use ackgen_config::{FieldConfig, FieldIntent, GeneratorConfig, SourceFieldConfig};
use tracing::{debug, warn};

use crate::error::{ModelError, ModelResult};
use crate::field::{Field, FieldFactory, FieldType, reference_field_name};
use crate::inflect;
use crate::names::Names;
use crate::op::{OpType, OperationMap};
use crate::printer;
use crate::resource::{Resource, ResourceOps};
use crate::sdk::SdkApi;

/// Member name of an attributes map unpacked into individual fields.
pub(crate) const ATTRIBUTES_MEMBER: &str = "Attributes";

/// A top-level field before nested materialization.
#[derive(Debug, Clone)]
pub(crate) struct FieldDraft {
    shape_ref: Option<ShapeRef>,
    config: Option<FieldConfig>,
    is_required: bool,
}

/// A resource whose top-level fields are chosen.
#[derive(Debug, Clone)]
pub(crate) struct ResourceDraft {
    name: String,
    ops: ResourceOps,
    spec: BTreeMap<String, FieldDraft>,
    status: BTreeMap<String, FieldDraft>,
}

impl ResourceDraft {
    /// Place `field` in Spec or Status, removing it from the other set.
    fn place(&mut self, name: &str, field: FieldDraft, read_only: bool) {
        let (to, from) = if read_only {
            (&mut self.status, &mut self.spec)
        } else {
            (&mut self.spec, &mut self.status)
        };
        from.remove(name);
        to.insert(name.to_owned(), field);
    }

    fn top_level(&self, segment: &str) -> Option<&FieldDraft> {
        self.spec
            .iter()
            .chain(&self.status)
            .find(|(name, _)| {
                name.as_str() == segment
                    || name.eq_ignore_ascii_case(segment)
                    || Names::new(name).camel == segment
            })
            .map(|(_, field)| field)
    }
}

fn resource_ops(operations: &OperationMap, resource: &str) -> ResourceOps {
    let get = |kind| operations.get(kind, resource).map(ToOwned::to_owned);
    ResourceOps {
        create: get(OpType::Create),
        read_one: get(OpType::Get),
        read_many: get(OpType::List),
        update: get(OpType::Update),
        delete: get(OpType::Delete),
        get_attributes: get(OpType::GetAttributes),
        set_attributes: get(OpType::SetAttributes),
    }
}

fn absent(resource: &str, what: impl Into<String>) -> ModelError {
    ModelError::AbsentShape {
        resource: resource.to_owned(),
        what: what.into(),
    }
}

/// Choose the top-level Spec and Status fields of `resource`.
pub(crate) fn draft_resource(
    sdk: &SdkApi,
    config: &GeneratorConfig,
    resource: &str,
) -> ModelResult<ResourceDraft> {
    let api = sdk.api();
    let ops = resource_ops(sdk.operation_map(), resource);
    let create_id = ops
        .create
        .clone()
        .ok_or_else(|| absent(resource, "create operation"))?;
    let create = sdk
        .operation(&create_id)
        .ok_or_else(|| absent(resource, format!("operation {create_id}")))?;
    let input = create
        .input
        .as_ref()
        .ok_or_else(|| absent(resource, format!("input of {create_id}")))?;
    let unpack = config.unpacks_attributes_map(resource);

    let mut draft = ResourceDraft {
        name: resource.to_owned(),
        ops: ops.clone(),
        spec: BTreeMap::new(),
        status: BTreeMap::new(),
    };

    // Spec: the create input, or the members of its configured wrapper.
    let input_root = match config.input_wrapper_field_path(&create_id) {
        Some(wrapper) => descend_wrapper(sdk, &create_id, input, wrapper, false)?,
        None => input.clone(),
    };
    let input_shape = api.target(&input_root);
    let input_members = input_shape
        .members()
        .ok_or_else(|| absent(resource, format!("input structure of {create_id}")))?;
    for (member_name, member_ref) in input_members {
        if unpack && member_name == ATTRIBUTES_MEMBER {
            continue;
        }
        let field_name = config.resource_field_name(resource, &create_id, member_name);
        let field_config = config.field_config(resource, &field_name);
        if field_config.is_some_and(|c| !c.is_read_only && matches!(c.intent(), FieldIntent::SourcedFrom(_))) {
            debug!(resource, field = %field_name, "input member left to its configured source");
            continue;
        }
        draft.spec.insert(
            field_name,
            FieldDraft {
                shape_ref: Some(member_ref.clone()),
                config: field_config.cloned(),
                is_required: input_shape.required.contains(member_name),
            },
        );
    }

    if unpack {
        for (field_name, field_config) in config.field_configs(resource) {
            if !field_config.is_attribute || is_primary_arn(config, resource, field_name) {
                continue;
            }
            let field = FieldDraft {
                shape_ref: None,
                config: Some(field_config.clone()),
                is_required: false,
            };
            draft.place(field_name, field, field_config.is_read_only);
        }
    }

    // Configured top-level fields, layered over the schema members.
    for (field_name, field_config) in config.field_configs(resource) {
        if field_config.is_attribute || field_name.contains('.') {
            continue;
        }
        let read_only = field_config.is_read_only;
        let shape_ref = match field_config.intent() {
            FieldIntent::SourcedFrom(from) => {
                Some(resolve_source(sdk, resource, field_name, from, read_only)?)
            }
            FieldIntent::Custom(custom) => Some(
                sdk.custom_shape_ref(custom)
                    .cloned()
                    .ok_or_else(|| ModelError::UnknownCustomShape {
                        shape: custom.member_shape().to_owned(),
                    })?,
            ),
            FieldIntent::TypeOverride(_) => {
                let existing = draft
                    .spec
                    .remove(field_name)
                    .or_else(|| draft.status.remove(field_name));
                let field = match existing {
                    Some(mut field) => {
                        field.config = Some(field_config.clone());
                        field
                    }
                    None => FieldDraft {
                        shape_ref: None,
                        config: Some(field_config.clone()),
                        is_required: false,
                    },
                };
                draft.place(field_name, field, read_only);
                continue;
            }
            FieldIntent::Inferred => {
                if read_only {
                    if let Some(mut field) = draft.spec.remove(field_name) {
                        field.config = Some(field_config.clone());
                        draft.status.insert(field_name.to_owned(), field);
                    }
                }
                continue;
            }
        };
        let field = FieldDraft {
            shape_ref,
            config: Some(field_config.clone()),
            is_required: false,
        };
        draft.place(field_name, field, read_only);
    }

    // Status: members of the effective create output not already in Spec.
    if let Some(output) = create.output.as_ref() {
        let output_root = match config.output_wrapper_field_path(&create_id) {
            Some(wrapper) => descend_wrapper(sdk, &create_id, output, wrapper, true)?,
            None => auto_unwrap(sdk, output),
        };
        if let Some(members) = api.target(&output_root).members() {
            for (member_name, member_ref) in members {
                let field_name = config.resource_field_name(resource, &create_id, member_name);
                if draft.spec.contains_key(&field_name)
                    || draft.status.contains_key(&field_name)
                    || (unpack && member_name == ATTRIBUTES_MEMBER)
                    || is_primary_arn(config, resource, &field_name)
                {
                    continue;
                }
                draft.status.insert(
                    field_name.clone(),
                    FieldDraft {
                        shape_ref: Some(member_ref.clone()),
                        config: config.field_config(resource, &field_name).cloned(),
                        is_required: false,
                    },
                );
            }
        }
    }

    debug!(
        resource,
        spec = draft.spec.len(),
        status = draft.status.len(),
        "drafted resource"
    );
    Ok(draft)
}

/// Whether `field_name` is the resource's primary ARN, which moves to the
/// common resource metadata when that is enabled.
fn is_primary_arn(config: &GeneratorConfig, resource: &str, field_name: &str) -> bool {
    if !config.include_resource_metadata {
        return false;
    }
    if let Some((arn_field, _)) = config.field_configs(resource).find(|(_, c)| c.is_arn) {
        return arn_field.eq_ignore_ascii_case(field_name);
    }
    field_name.eq_ignore_ascii_case("arn") || field_name.eq_ignore_ascii_case(&format!("{resource}arn"))
}

fn resolve_source(
    sdk: &SdkApi,
    resource: &str,
    field_name: &str,
    from: &SourceFieldConfig,
    read_only: bool,
) -> ModelResult<ShapeRef> {
    let input = || sdk.input_shape_ref_at(&from.operation, &from.path);
    let output = || sdk.output_shape_ref_at(&from.operation, &from.path);
    let found = if read_only {
        output().or_else(input)
    } else {
        input().or_else(output)
    };
    found.cloned().ok_or_else(|| ModelError::UnknownFieldSource {
        resource: resource.to_owned(),
        field: field_name.to_owned(),
        operation: from.operation.clone(),
        path: from.path.clone(),
    })
}

/// Follow a configured wrapper path down from `root`.
///
/// Every segment must name a structure member; output wrappers may also
/// name a list of structures, whose element is used.
fn descend_wrapper(
    sdk: &SdkApi,
    op_id: &str,
    root: &ShapeRef,
    path: &str,
    allow_list: bool,
) -> ModelResult<ShapeRef> {
    let api = sdk.api();
    let invalid = |reason: String| ModelError::InvalidWrapperField {
        operation: op_id.to_owned(),
        path: path.to_owned(),
        reason,
    };
    let mut current = root.clone();
    for segment in FieldPath::parse(path).parts().iter().filter(|s| !s.is_empty()) {
        let shape = api.target(&current);
        let (_, member) = shape
            .member_ignore_case(segment)
            .ok_or_else(|| invalid(format!("{} has no member {segment}", shape.name)))?;
        let mut member = member.clone();
        if allow_list {
            if let ShapeKind::List { member: element } = &api.target(&member).kind {
                member = element.clone();
            }
        }
        let target = api.target(&member);
        if !target.is_structure() {
            return Err(invalid(format!(
                "member {segment} is a {}, not a structure",
                target.type_name()
            )));
        }
        current = member;
    }
    Ok(current)
}

/// Unwrap an output whose only member is a structure.
fn auto_unwrap(sdk: &SdkApi, output: &ShapeRef) -> ShapeRef {
    let api = sdk.api();
    match api.target(output).members() {
        Some(members) if members.len() == 1 => members
            .values()
            .next()
            .filter(|member| api.target(member).is_structure())
            .map_or_else(|| output.clone(), Clone::clone),
        _ => output.clone(),
    }
}

/// Inject the dotted fields configured for `draft`'s resource into their
/// parent structure shapes.
///
/// Only dotted fields with an explicit `type` are injected; the parent path
/// must lead through structures (collection boundaries are looked through).
/// An existing member of the same name is retyped.
pub(crate) fn attach_custom_nested_fields(
    sdk: &mut SdkApi,
    config: &GeneratorConfig,
    draft: &ResourceDraft,
) -> ModelResult<()> {
    for (path, field_config) in config.field_configs(&draft.name) {
        if !path.contains('.') {
            continue;
        }
        let FieldIntent::TypeOverride(type_string) = field_config.intent() else {
            continue;
        };
        let invalid = |reason: String| ModelError::InvalidCustomNestedField {
            resource: draft.name.clone(),
            field: path.to_owned(),
            reason,
        };

        let field_path = FieldPath::parse(path);
        let top = draft
            .top_level(field_path.front())
            .ok_or_else(|| invalid(format!("{} is not a Spec or Status field", field_path.front())))?;
        let mut current = top
            .shape_ref
            .clone()
            .ok_or_else(|| invalid(format!("{} has no schema shape", field_path.front())))?;

        let api = sdk.api();
        let middle = &field_path.parts()[1..field_path.size() - 1];
        for segment in middle.iter().filter(|s| !s.is_empty()) {
            let container = api.container_ref(&current);
            let shape = api.target(container);
            if !shape.is_structure() {
                return Err(invalid(format!("{} is a {}, not a structure", shape.name, shape.type_name())));
            }
            current = shape
                .member_ignore_case(segment)
                .map(|(_, member)| member.clone())
                .ok_or_else(|| invalid(format!("{} has no member {segment}", shape.name)))?;
        }
        let parent = api.container_ref(&current).clone();
        let parent_shape = api.target(&parent);
        if !parent_shape.is_structure() {
            return Err(invalid(format!(
                "{} is a {}, not a structure",
                parent_shape.name,
                parent_shape.type_name()
            )));
        }
        let member = field_path.back();
        let key = parent_shape
            .member_ignore_case(member)
            .map_or_else(|| member.to_owned(), |(key, _)| key.to_owned());

        let member_ref = sdk.type_override_ref(type_string)?;
        if let ShapeKind::Structure { members } = &mut sdk.api_mut().shape_mut(parent.shape).kind {
            debug!(resource = %draft.name, field = path, shape = %parent.name, "injected custom nested field");
            members.insert(key, member_ref);
        }
    }
    Ok(())
}

/// Materialize `draft` into a complete resource.
pub(crate) fn finish_resource(
    sdk: &SdkApi,
    config: &GeneratorConfig,
    draft: ResourceDraft,
) -> ModelResult<Resource> {
    let ResourceDraft {
        name,
        ops,
        spec,
        status,
    } = draft;
    let factory = FieldFactory {
        sdk,
        config,
        resource: &name,
    };

    let mut fields = BTreeMap::new();
    let mut build_all = |drafts: BTreeMap<String, FieldDraft>| -> ModelResult<BTreeMap<String, Field>> {
        let mut built = BTreeMap::new();
        for (field_name, draft) in drafts {
            let names = Names::new(&field_name);
            let field = factory.build(
                names.camel.clone(),
                names,
                draft.shape_ref,
                draft.config,
                draft.is_required,
                &mut fields,
            )?;
            built.insert(field_name, field);
        }
        Ok(built)
    };
    let mut spec_fields = build_all(spec)?;
    let status_fields = build_all(status)?;

    let mut type_imports = std::collections::BTreeSet::new();
    let referencing: Vec<(String, Field)> = spec_fields
        .iter()
        .filter(|(_, field)| field.has_reference())
        .map(|(field_name, field)| (field_name.clone(), field.clone()))
        .collect();
    for (field_name, field) in referencing {
        let is_list = field.is_list(sdk);
        let ref_name = reference_field_name(&field_name, is_list).ok_or_else(|| {
            ModelError::InvalidReferenceField {
                resource: name.clone(),
                field: field_name.clone(),
            }
        })?;
        if status_fields.contains_key(&ref_name) {
            warn!(resource = %name, field = %ref_name, "reference field name is already a Status field");
            continue;
        }
        let names = Names::new(&ref_name);
        let reference = Field {
            path: names.camel.clone(),
            names,
            field_type: if is_list {
                FieldType::List {
                    element: Box::new(FieldType::ResourceReference),
                }
            } else {
                FieldType::ResourceReference
            },
            shape_ref: None,
            config: None,
            is_required: false,
            member_fields: BTreeMap::new(),
        };
        if let Some(service) = field
            .config
            .as_ref()
            .and_then(|c| c.references.as_ref())
            .and_then(|r| r.service_name.as_deref())
            .filter(|service| !service.eq_ignore_ascii_case(&sdk.api().service_id))
        {
            type_imports.insert(service.to_owned());
        }
        fields.insert(reference.path.clone(), reference.clone());
        spec_fields.insert(ref_name, reference);
    }

    let printer_columns = printer::printer_columns(
        &name,
        config.print_order_by(&name),
        &spec_fields,
        &status_fields,
    )?;

    let names = Names::new(&name);
    let create_op: Vec<&str> = ops.create.as_deref().into_iter().collect();
    let resource = Resource {
        kind: names.camel.clone(),
        plural: inflect::pluralize(&names.camel),
        short_names: config.short_names(&name).to_vec(),
        renames: config.all_renames(&name, &create_op),
        tag_path: (!config.tags_ignored(&name)).then(|| config.tag_field_path(&name).to_owned()),
        printer_columns,
        print_age_column: config.prints_age_column(&name),
        print_synced_column: config.prints_synced_column(&name),
        names,
        ops,
        spec_fields,
        status_fields,
        fields,
        type_imports,
    };
    debug!(
        resource = %name,
        spec = resource.spec_fields.len(),
        status = resource.status_fields.len(),
        fields = resource.fields.len(),
        "built resource"
    );
    Ok(resource)
}

#[cfg(test)]
mod tests {
    use ackgen_api::{Api, ApiBuilder, ScalarKind};

    use super::*;
    use crate::model::Model;
    use crate::options::ModelOptions;

    fn gadget_api() -> Api {
        ApiBuilder::new("gadgets")
            .structure(
                "CreateGadgetRequest",
                &[
                    ("Name", "String"),
                    ("SubnetId", "String"),
                    ("Size", "Long"),
                    ("Settings", "Settings"),
                ],
            )
            .structure("Settings", &[("Mode", "String")])
            .structure(
                "CreateGadgetResponse",
                &[("GadgetId", "String"), ("OwnerId", "String"), ("CreatedAt", "Timestamp")],
            )
            .string("String")
            .scalar("Long", ScalarKind::Long)
            .scalar("Timestamp", ScalarKind::Timestamp)
            .operation("CreateGadget", Some("CreateGadgetRequest"), Some("CreateGadgetResponse"))
            .build()
            .expect("api")
    }

    fn build(config: &str) -> ModelResult<Model> {
        let config = GeneratorConfig::from_yaml_str(config).expect("config");
        Model::new(gadget_api(), config, ModelOptions::default())
    }

    #[test]
    fn test_should_add_reference_fields_for_spec_fields_only() {
        let model = build(
            r"
resources:
  Gadget:
    fields:
      SubnetId:
        references:
          resource: Subnet
          path: Status.SubnetID
      OwnerId:
        references:
          resource: Account
          path: Status.AccountID
",
        )
        .expect("model");
        let gadget = model.resource("Gadget").expect("gadget");
        let subnet = &gadget.spec_fields["SubnetRef"];
        assert_eq!(subnet.field_type, FieldType::ResourceReference);
        assert!(gadget.is_status_field("OwnerId"));
        assert!(!gadget.is_spec_field("OwnerRef"));
        assert!(gadget.field("OwnerRef").is_none());
    }

    #[test]
    fn test_should_reject_unresolvable_field_sources() {
        for (operation, path) in [("GetGadget", "Isbn"), ("CreateGadget", "Missing")] {
            let config = format!(
                "resources:\n  Gadget:\n    fields:\n      Isbn:\n        from:\n          operation: {operation}\n          path: {path}\n"
            );
            let err = build(&config).expect_err("unknown source");
            assert!(
                matches!(
                    &err,
                    ModelError::UnknownFieldSource { resource, field, operation: op, path: p }
                        if resource == "Gadget" && field == "Isbn" && op == operation && p == path
                ),
                "{err}"
            );
        }
    }

    #[test]
    fn test_should_reject_unsupported_type_overrides() {
        let err = build("resources:\n  Gadget:\n    fields:\n      Extra:\n        type: map[int]string\n")
            .expect_err("unsupported type");
        assert!(matches!(
            err,
            ModelError::UnsupportedTypeOverride { type_name } if type_name == "map[int]string"
        ));
    }

    const PRINTED: &str = r"
resources:
  Gadget:
    fields:
      Name:
        print: {}
      Size:
        print:
          name: SIZE
          priority: 1
          index: 3
      CreatedAt:
        print:
          index: 2
";

    #[test]
    fn test_should_collect_printer_columns_by_name() {
        let model = build(PRINTED).expect("model");
        let gadget = model.resource("Gadget").expect("gadget");
        let columns: Vec<_> = gadget
            .printer_columns
            .iter()
            .map(|c| (c.name.as_str(), c.column_type.as_str(), c.json_path.as_str(), c.priority))
            .collect();
        assert_eq!(
            columns,
            vec![
                ("CreatedAt", "date", ".status.createdAt", 0),
                ("Name", "string", ".spec.name", 0),
                ("SIZE", "integer", ".spec.size", 1),
            ]
        );
        assert!(!gadget.print_age_column);
        assert!(gadget.print_synced_column);
    }

    #[test]
    fn test_should_order_printer_columns_by_index() {
        let config = format!("{PRINTED}    print:\n      order_by: Index\n      add_age_column: true\n");
        let model = build(&config).expect("model");
        let gadget = model.resource("Gadget").expect("gadget");
        let names: Vec<_> = gadget.printer_columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Name", "CreatedAt", "SIZE"]);
        assert!(gadget.print_age_column);
    }

    #[test]
    fn test_should_reject_unprintable_columns() {
        let err = build("resources:\n  Gadget:\n    fields:\n      Settings:\n        print: {}\n")
            .expect_err("structure column");
        assert!(matches!(
            err,
            ModelError::UnprintableField { resource, field, field_type }
                if resource == "Gadget" && field == "Settings" && field_type == "Settings"
        ));

        let err = build("resources:\n  Gadget:\n    print:\n      order_by: priority\n")
            .expect_err("unknown order");
        assert!(matches!(
            err,
            ModelError::UnknownColumnOrder { order_by, .. } if order_by == "priority"
        ));
    }
}
