//! Shape/operation index.
//!
//! [`SdkApi`] wraps a loaded [`Api`] after the configuration's ignore rules
//! have been applied and answers the lookups the model builder needs:
//! operations by id, input/output members by path, reserved type names and
//! the shapes synthesized for custom fields and explicit type strings.

use std::collections::{BTreeMap, BTreeSet};

use ackgen_api::{Api, FieldPath, Operation, ScalarKind, Shape, ShapeKind, ShapeRef};
use ackgen_config::{CustomShape, GeneratorConfig};
use tracing::debug;

use crate::error::{ModelError, ModelResult};
use crate::field::FieldType;
use crate::names::Names;
use crate::op::{OpType, OperationMap};

/// Schema view used while building a model.
#[derive(Debug, Clone)]
pub struct SdkApi {
    api: Api,
    operations: OperationMap,
    reserved: BTreeSet<String>,
    conflict_suffix: String,
    type_refs: BTreeMap<String, ShapeRef>,
    custom_refs: BTreeMap<(bool, String), ShapeRef>,
}

impl SdkApi {
    /// Index `api` under `config`.
    ///
    /// Ignore rules are applied first. Then every custom list/map shape and
    /// every explicit type string the configuration mentions is synthesized,
    /// so later lookups never need to mutate the schema.
    pub fn new(mut api: Api, config: &GeneratorConfig, conflict_suffix: &str) -> ModelResult<Self> {
        api.apply_ignore_rules(&config.ignore.shape_names, &config.ignore.field_paths);
        let operations = OperationMap::build(&api, config);

        let mut reserved = BTreeSet::new();
        for resource in operations.resources(OpType::Create) {
            if config.resource_is_ignored(resource) {
                continue;
            }
            let camel = Names::new(resource).camel;
            for suffix in ["", "Spec", "Status", "List"] {
                reserved.insert(format!("{camel}{suffix}"));
            }
        }

        let mut sdk = Self {
            api,
            operations,
            reserved,
            conflict_suffix: conflict_suffix.to_owned(),
            type_refs: BTreeMap::new(),
            custom_refs: BTreeMap::new(),
        };

        for custom in config.custom_shapes() {
            sdk.synthesize_custom_shape(custom)?;
        }
        let type_strings: BTreeSet<&str> = config
            .resources
            .values()
            .flat_map(|resource| resource.fields.values())
            .filter_map(|field| field.type_override.as_deref())
            .collect();
        for type_string in type_strings {
            sdk.shape_ref_from_type(type_string)?;
        }
        debug!(
            service = %sdk.api.service_id,
            shapes = sdk.api.shape_names().count(),
            reserved = sdk.reserved.len(),
            "indexed schema"
        );
        Ok(sdk)
    }

    /// The underlying schema.
    #[must_use]
    pub fn api(&self) -> &Api {
        &self.api
    }

    pub(crate) fn api_mut(&mut self) -> &mut Api {
        &mut self.api
    }

    /// Operations indexed by role and resource.
    #[must_use]
    pub fn operation_map(&self) -> &OperationMap {
        &self.operations
    }

    /// Operation with the given id.
    #[must_use]
    pub fn operation(&self, op_id: &str) -> Option<&Operation> {
        self.api.operation(op_id)
    }

    /// Every indexed shape name, sorted.
    pub fn all_shape_names(&self) -> impl Iterator<Item = &str> {
        self.api.shape_names()
    }

    /// Member of `op_id`'s input at the dotted `path` (relative to the input root).
    ///
    /// The empty path is the input root itself.
    #[must_use]
    pub fn input_shape_ref_at(&self, op_id: &str, path: &str) -> Option<&ShapeRef> {
        let root = self.operation(op_id)?.input.as_ref()?;
        self.shape_ref_at(root, path)
    }

    /// Member of `op_id`'s output at the dotted `path` (relative to the output root).
    #[must_use]
    pub fn output_shape_ref_at(&self, op_id: &str, path: &str) -> Option<&ShapeRef> {
        let root = self.operation(op_id)?.output.as_ref()?;
        self.shape_ref_at(root, path)
    }

    fn shape_ref_at<'a>(&'a self, root: &'a ShapeRef, path: &str) -> Option<&'a ShapeRef> {
        let relative = FieldPath::parse(path);
        let full = FieldPath::new(
            std::iter::once(root.name.as_str())
                .chain(relative.parts().iter().map(String::as_str).filter(|p| !p.is_empty())),
        );
        full.resolve(&self.api, root)
    }

    /// Names of every shape used as an operation input or output.
    #[must_use]
    pub fn payload_shape_names(&self) -> BTreeSet<String> {
        self.api
            .operations()
            .flat_map(|op| op.input.iter().chain(op.output.iter()))
            .map(|shape_ref| self.api.target(shape_ref).name.clone())
            .collect()
    }

    /// Whether `name` collides with a resource's own name or its
    /// `Spec`/`Status`/`List` derivatives.
    #[must_use]
    pub fn has_conflicting_type_name(&self, name: &str) -> bool {
        self.reserved.contains(&Names::new(name).camel)
    }

    /// Generated type name of the shape named `shape_name`, suffixed when it
    /// collides with a reserved name.
    #[must_use]
    pub fn type_name(&self, shape_name: &str) -> String {
        let camel = Names::new(shape_name).camel;
        if self.reserved.contains(&camel) {
            format!("{camel}{}", self.conflict_suffix)
        } else {
            camel
        }
    }

    /// Suffix appended to conflicting type names.
    #[must_use]
    pub fn conflict_suffix(&self) -> &str {
        &self.conflict_suffix
    }

    /// Synthesized container for a custom field.
    #[must_use]
    pub fn custom_shape_ref(&self, custom: CustomShape<'_>) -> Option<&ShapeRef> {
        self.custom_refs.get(&custom_key(custom))
    }

    /// Reference for an explicit type string such as `[]*string` or
    /// `map[string]*int64`, synthesizing the shapes on first use.
    ///
    /// Element types other than the built-in scalars name a schema shape.
    pub fn shape_ref_from_type(&mut self, type_string: &str) -> ModelResult<ShapeRef> {
        if let Some(existing) = self.type_refs.get(type_string) {
            return Ok(existing.clone());
        }
        let unsupported = || ModelError::UnsupportedTypeOverride {
            type_name: type_string.to_owned(),
        };

        let (collection, element) = if let Some(rest) = type_string.strip_prefix("[]") {
            if rest == "byte" {
                (None, "blob")
            } else {
                (Some(Collection::List), rest)
            }
        } else if let Some(rest) = type_string.strip_prefix("map[string]") {
            (Some(Collection::Map), rest)
        } else {
            (None, type_string)
        };
        let element = element.strip_prefix('*').unwrap_or(element);
        if element.is_empty() {
            return Err(unsupported());
        }

        let element_ref = match scalar_from_type(element) {
            Some(scalar) => self.scalar_ref(scalar),
            None => {
                let id = self.api.shape_id(element).ok_or_else(unsupported)?;
                ShapeRef::new(element, id)
            }
        };
        let shape_ref = match collection {
            None => element_ref,
            Some(Collection::List) => {
                let name = format!("[]{}", element_ref.name);
                self.intern(&name, || ShapeKind::List {
                    member: element_ref.clone(),
                })
            }
            Some(Collection::Map) => {
                let key = self.scalar_ref(ScalarKind::String);
                let name = format!("map[string]{}", element_ref.name);
                self.intern(&name, || ShapeKind::Map {
                    key: key.clone(),
                    value: element_ref.clone(),
                })
            }
        };
        self.type_refs.insert(type_string.to_owned(), shape_ref.clone());
        Ok(shape_ref)
    }

    /// Reference for a type string interned when the index was built.
    pub fn type_override_ref(&self, type_string: &str) -> ModelResult<ShapeRef> {
        self.type_refs
            .get(type_string)
            .cloned()
            .ok_or_else(|| ModelError::UnsupportedTypeOverride {
                type_name: type_string.to_owned(),
            })
    }

    /// Generated type of a field backed by `shape_ref`.
    #[must_use]
    pub fn field_type(&self, shape_ref: &ShapeRef) -> FieldType {
        let mut wrappers = Vec::new();
        let mut seen = BTreeSet::new();
        let mut current = shape_ref;
        let base = loop {
            if !seen.insert(current.shape) {
                break FieldType::Scalar {
                    scalar: ScalarKind::Document,
                };
            }
            let shape = self.api.target(current);
            match &shape.kind {
                ShapeKind::List { member } => {
                    wrappers.push(Collection::List);
                    current = member;
                }
                ShapeKind::Map { value, .. } => {
                    wrappers.push(Collection::Map);
                    current = value;
                }
                ShapeKind::Structure { .. } => {
                    break FieldType::Structure {
                        name: self.type_name(&shape.name),
                    };
                }
                ShapeKind::Scalar { scalar } => break FieldType::Scalar { scalar: *scalar },
            }
        };
        wrappers
            .into_iter()
            .rev()
            .fold(base, |inner, wrapper| match wrapper {
                Collection::Map => FieldType::Map {
                    value: Box::new(inner),
                },
                Collection::List => FieldType::List {
                    element: Box::new(inner),
                },
            })
    }

    /// Resources surfaced by Create operations, minus ignored names, sorted.
    #[must_use]
    pub fn resource_names(&self, config: &GeneratorConfig) -> Vec<String> {
        self.operations
            .resources(OpType::Create)
            .filter(|name| !config.resource_is_ignored(name))
            .map(ToOwned::to_owned)
            .collect()
    }

    fn scalar_ref(&mut self, scalar: ScalarKind) -> ShapeRef {
        self.intern(scalar.as_str(), || ShapeKind::Scalar { scalar })
    }

    /// Reference to the synthetic shape `name`, adding it when absent.
    fn intern(&mut self, name: &str, kind: impl FnOnce() -> ShapeKind) -> ShapeRef {
        if let Some(id) = self.api.shape_id(name) {
            return ShapeRef::new(name, id);
        }
        let id = self.api.add_shape(Shape::new(name, kind()));
        ShapeRef::new(name, id)
    }

    fn synthesize_custom_shape(&mut self, custom: CustomShape<'_>) -> ModelResult<()> {
        let member_name = custom.member_shape();
        let member_id = self
            .api
            .shape_id(member_name)
            .ok_or_else(|| ModelError::UnknownCustomShape {
                shape: member_name.to_owned(),
            })?;
        let member = ShapeRef::new(member_name, member_id);

        let (base, kind) = match custom {
            CustomShape::ListOf(_) => (format!("{member_name}List"), ShapeKind::List { member }),
            CustomShape::MapOf(_) => {
                let key = self.scalar_ref(ScalarKind::String);
                (
                    format!("{member_name}Map"),
                    ShapeKind::Map { key, value: member },
                )
            }
        };

        let mut name = base;
        let shape_ref = loop {
            match self.api.shape_id(&name) {
                Some(id) if self.api.shape(id).kind == kind => break ShapeRef::new(name, id),
                Some(_) => name.push_str(&self.conflict_suffix),
                None => {
                    let id = self.api.add_shape(Shape::new(name.as_str(), kind));
                    break ShapeRef::new(name, id);
                }
            }
        };
        debug!(shape = %shape_ref.name, "synthesized custom shape");
        self.custom_refs.insert(custom_key(custom), shape_ref);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum Collection {
    List,
    Map,
}

fn custom_key(custom: CustomShape<'_>) -> (bool, String) {
    match custom {
        CustomShape::ListOf(name) => (true, name.to_owned()),
        CustomShape::MapOf(name) => (false, name.to_owned()),
    }
}

fn scalar_from_type(element: &str) -> Option<ScalarKind> {
    Some(match element.to_ascii_lowercase().as_str() {
        "string" => ScalarKind::String,
        "bool" | "boolean" => ScalarKind::Boolean,
        "int" | "int32" | "integer" => ScalarKind::Integer,
        "int64" | "long" => ScalarKind::Long,
        "float32" | "float" => ScalarKind::Float,
        "float64" | "double" => ScalarKind::Double,
        "time.time" | "timestamp" => ScalarKind::Timestamp,
        "blob" => ScalarKind::Blob,
        "document" => ScalarKind::Document,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use ackgen_api::ApiBuilder;

    use super::*;

    fn books_api() -> Api {
        ApiBuilder::new("books")
            .structure("CreateBookRequest", &[("Title", "String"), ("Author", "Author")])
            .structure("CreateBookResponse", &[("Book", "Book")])
            .structure("Book", &[("Title", "String"), ("Arn", "String")])
            .structure("Author", &[("Name", "String"), ("Tags", "TagList")])
            .list("TagList", "Tag")
            .structure("Tag", &[("Key", "String"), ("Value", "String")])
            .string("String")
            .operation("CreateBook", Some("CreateBookRequest"), Some("CreateBookResponse"))
            .operation("CreateBookSpec", None, None)
            .build()
            .expect("api")
    }

    fn books_sdk(config: &GeneratorConfig) -> SdkApi {
        SdkApi::new(books_api(), config, "_SDK").expect("sdk")
    }

    #[test]
    fn test_should_resolve_members_relative_to_operation_roots() {
        let sdk = books_sdk(&GeneratorConfig::default());
        let title = sdk.input_shape_ref_at("CreateBook", "Title").expect("title");
        assert_eq!(sdk.api().target(title).name, "String");
        let tag_key = sdk
            .input_shape_ref_at("CreateBook", "Author.Tags.Key")
            .expect("tag key");
        assert_eq!(tag_key.name, "String");
        let root = sdk.output_shape_ref_at("CreateBook", "").expect("root");
        assert_eq!(root.name, "CreateBookResponse");
        assert!(sdk.input_shape_ref_at("CreateBook", "Missing").is_none());
        assert!(sdk.input_shape_ref_at("DeleteBook", "Title").is_none());
    }

    #[test]
    fn test_should_suffix_reserved_type_names() {
        let sdk = books_sdk(&GeneratorConfig::default());
        assert!(sdk.has_conflicting_type_name("Book"));
        assert!(sdk.has_conflicting_type_name("BookList"));
        assert!(!sdk.has_conflicting_type_name("Author"));
        assert_eq!(sdk.type_name("Book"), "Book_SDK");
        assert_eq!(sdk.type_name("Author"), "Author");
    }

    #[test]
    fn test_should_list_payload_shapes_and_resources() {
        let config =
            GeneratorConfig::from_yaml_str("ignore:\n  resource_names: [BookSpec]\n").expect("config");
        let sdk = books_sdk(&config);
        let payloads = sdk.payload_shape_names();
        assert!(payloads.contains("CreateBookRequest"));
        assert!(payloads.contains("CreateBookResponse"));
        assert!(!payloads.contains("Book"));
        assert_eq!(sdk.resource_names(&config), vec!["Book"]);
    }

    #[test]
    fn test_should_synthesize_type_strings() {
        let mut sdk = books_sdk(&GeneratorConfig::default());
        let list = sdk.shape_ref_from_type("[]*string").expect("list");
        assert_eq!(sdk.field_type(&list).to_string(), "[]string");
        let map = sdk.shape_ref_from_type("map[string]*int64").expect("map");
        assert_eq!(sdk.field_type(&map).to_string(), "map[string]long");
        let tags = sdk.shape_ref_from_type("[]*Tag").expect("tags");
        assert_eq!(sdk.field_type(&tags).to_string(), "[]Tag");
        let again = sdk.shape_ref_from_type("[]string").expect("list");
        assert_eq!(again.shape, list.shape);
        assert!(matches!(
            sdk.shape_ref_from_type("chan int"),
            Err(ModelError::UnsupportedTypeOverride { .. })
        ));
    }

    #[test]
    fn test_should_synthesize_custom_shapes_from_config() {
        let config = GeneratorConfig::from_yaml_str(
            r"
resources:
  Book:
    fields:
      Authors:
        custom_field:
          list_of: Author
      Labels:
        custom_field:
          map_of: Tag
      Pages:
        type: '[]*int64'
",
        )
        .expect("config");
        let sdk = books_sdk(&config);
        let authors = sdk
            .custom_shape_ref(CustomShape::ListOf("Author"))
            .expect("authors");
        assert_eq!(authors.name, "AuthorList");
        assert_eq!(sdk.field_type(authors).to_string(), "[]Author");
        let labels = sdk.custom_shape_ref(CustomShape::MapOf("Tag")).expect("labels");
        assert_eq!(sdk.field_type(labels).to_string(), "map[string]Tag");
        let pages = sdk.type_override_ref("[]*int64").expect("pages");
        assert_eq!(sdk.field_type(&pages).to_string(), "[]long");
    }

    #[test]
    fn test_should_reject_unknown_custom_shapes() {
        let config = GeneratorConfig::from_yaml_str(
            "resources:\n  Book:\n    fields:\n      X:\n        custom_field:\n          list_of: Nope\n",
        )
        .expect("config");
        let err = SdkApi::new(books_api(), &config, "_SDK").expect_err("unknown shape");
        assert!(matches!(err, ModelError::UnknownCustomShape { shape } if shape == "Nope"));
    }
}
