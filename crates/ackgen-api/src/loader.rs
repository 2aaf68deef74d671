//! Smithy JSON AST loader.
//!
//! Converts a [`SmithyModel`] document into an [`Api`]. Absolute shape ids are
//! shortened to their local names, prelude targets (`smithy.api#String`, ...)
//! become scalar shapes named after the prelude type, and trait data the
//! model builder cares about (documentation, errors, required members, enum
//! values) is lifted onto the shapes.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::builder::{ApiBuilder, KindDef, OperationDef, ShapeDef};
use crate::error::{ApiError, ApiResult};
use crate::shape::{Api, ScalarKind};
use crate::smithy::{AggregateShape, MemberShape, SmithyModel, SmithyShape, Traits};

const PRELUDE_NAMESPACE: &str = "smithy.api#";
const UNIT: &str = "smithy.api#Unit";
const TRAIT_DOCUMENTATION: &str = "smithy.api#documentation";
const TRAIT_ERROR: &str = "smithy.api#error";
const TRAIT_HTTP_ERROR: &str = "smithy.api#httpError";
const TRAIT_REQUIRED: &str = "smithy.api#required";
const TRAIT_ENUM_VALUE: &str = "smithy.api#enumValue";
const TRAIT_AWS_SERVICE: &str = "aws.api#service";

/// Parse a Smithy JSON AST document into an [`Api`].
pub fn load_smithy_json(text: &str) -> ApiResult<Api> {
    let model: SmithyModel = serde_json::from_str(text)?;
    convert(&model)
}

/// Read and parse a Smithy JSON AST file into an [`Api`].
pub fn load_smithy_file(path: impl AsRef<Path>) -> ApiResult<Api> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ApiError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_smithy_json(&text)
}

/// Convert an already parsed document into an [`Api`].
pub fn convert(model: &SmithyModel) -> ApiResult<Api> {
    let mut builder = ApiBuilder::new(service_id(model));
    let mut prelude: BTreeSet<String> = BTreeSet::new();

    for (shape_id, shape) in &model.shapes {
        let name = SmithyModel::short_name(shape_id);
        let def = match shape {
            SmithyShape::Service(_) | SmithyShape::Resource(_) => continue,
            SmithyShape::Operation(op) => {
                let errors = op
                    .errors
                    .iter()
                    .map(|error| target_name(&error.target, &mut prelude))
                    .collect();
                builder.push_operation(OperationDef {
                    name: name.to_owned(),
                    input: op
                        .input
                        .as_ref()
                        .filter(|input| input.target != UNIT)
                        .map(|input| target_name(&input.target, &mut prelude)),
                    output: op
                        .output
                        .as_ref()
                        .filter(|output| output.target != UNIT)
                        .map(|output| target_name(&output.target, &mut prelude)),
                    errors,
                    documentation: documentation(&op.traits),
                });
                continue;
            }
            SmithyShape::Structure(aggregate) | SmithyShape::Union(aggregate) => {
                structure_def(name, aggregate, &mut prelude)
            }
            SmithyShape::Enum(aggregate) => {
                let mut def = ShapeDef::new(name, KindDef::Scalar(ScalarKind::String));
                def.enum_values = Some(enum_values(aggregate));
                def.documentation = documentation(&aggregate.traits);
                def
            }
            SmithyShape::IntEnum(aggregate) => {
                let mut def = ShapeDef::new(name, KindDef::Scalar(ScalarKind::Integer));
                def.documentation = documentation(&aggregate.traits);
                def
            }
            SmithyShape::List(list) | SmithyShape::Set(list) => {
                let mut def = ShapeDef::new(
                    name,
                    KindDef::List(member_target(&list.member, &mut prelude)?),
                );
                def.documentation = documentation(&list.traits);
                def
            }
            SmithyShape::Map(map) => {
                let mut def = ShapeDef::new(
                    name,
                    KindDef::Map(
                        member_target(&map.key, &mut prelude)?,
                        member_target(&map.value, &mut prelude)?,
                    ),
                );
                def.documentation = documentation(&map.traits);
                def
            }
            SmithyShape::String(simple)
            | SmithyShape::Boolean(simple)
            | SmithyShape::Byte(simple)
            | SmithyShape::Short(simple)
            | SmithyShape::Integer(simple)
            | SmithyShape::Long(simple)
            | SmithyShape::BigInteger(simple)
            | SmithyShape::Float(simple)
            | SmithyShape::Double(simple)
            | SmithyShape::BigDecimal(simple)
            | SmithyShape::Timestamp(simple)
            | SmithyShape::Blob(simple)
            | SmithyShape::Document(simple) => {
                let mut def = ShapeDef::new(name, KindDef::Scalar(simple_scalar(shape)));
                def.documentation = documentation(&simple.traits);
                def
            }
        };
        builder.push_shape(def);
    }

    for name in prelude {
        if builder.has_shape(&name) {
            continue;
        }
        let scalar = prelude_scalar(&name).ok_or_else(|| {
            ApiError::InvalidDocument(format!("unsupported prelude shape {PRELUDE_NAMESPACE}{name}"))
        })?;
        builder.push_shape(ShapeDef::new(name, KindDef::Scalar(scalar)));
    }

    let api = builder.build()?;
    debug!(
        service = %api.service_id,
        shapes = api.shape_names().count(),
        operations = api.operation_names().count(),
        "loaded smithy model"
    );
    Ok(api)
}

fn service_id(model: &SmithyModel) -> String {
    model
        .shapes
        .iter()
        .find_map(|(shape_id, shape)| match shape {
            SmithyShape::Service(service) => Some(
                service
                    .traits
                    .get(TRAIT_AWS_SERVICE)
                    .and_then(|t| t.get("sdkId"))
                    .and_then(serde_json::Value::as_str)
                    .map_or_else(
                        || SmithyModel::short_name(shape_id).to_owned(),
                        str::to_owned,
                    ),
            ),
            _ => None,
        })
        .unwrap_or_default()
}

fn structure_def(name: &str, aggregate: &AggregateShape, prelude: &mut BTreeSet<String>) -> ShapeDef {
    let members = aggregate
        .members
        .iter()
        .filter(|(_, member)| member.target != UNIT)
        .map(|(member_name, member)| {
            (member_name.clone(), target_name(&member.target, prelude))
        })
        .collect();
    let mut def = ShapeDef::new(name, KindDef::Structure(members));
    def.required = aggregate
        .members
        .iter()
        .filter(|(_, member)| member.traits.contains_key(TRAIT_REQUIRED))
        .map(|(member_name, _)| member_name.clone())
        .collect();
    if aggregate.traits.contains_key(TRAIT_ERROR) {
        let status = aggregate
            .traits
            .get(TRAIT_HTTP_ERROR)
            .and_then(serde_json::Value::as_u64)
            .and_then(|code| u16::try_from(code).ok());
        def.exception = Some(status);
    }
    def.documentation = documentation(&aggregate.traits);
    def
}

fn enum_values(aggregate: &AggregateShape) -> Vec<String> {
    aggregate
        .members
        .iter()
        .map(|(member_name, member)| {
            member
                .traits
                .get(TRAIT_ENUM_VALUE)
                .and_then(serde_json::Value::as_str)
                .map_or_else(|| member_name.clone(), str::to_owned)
        })
        .collect()
}

fn member_target(member: &MemberShape, prelude: &mut BTreeSet<String>) -> ApiResult<String> {
    if member.target == UNIT {
        return Err(ApiError::InvalidDocument(
            "collection member cannot target smithy.api#Unit".to_owned(),
        ));
    }
    Ok(target_name(&member.target, prelude))
}

fn target_name(target: &str, prelude: &mut BTreeSet<String>) -> String {
    if let Some(name) = target.strip_prefix(PRELUDE_NAMESPACE) {
        prelude.insert(name.to_owned());
    }
    SmithyModel::short_name(target).to_owned()
}

fn documentation(traits: &Traits) -> Option<String> {
    traits
        .get(TRAIT_DOCUMENTATION)
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}

fn simple_scalar(shape: &SmithyShape) -> ScalarKind {
    match shape {
        SmithyShape::Boolean(_) => ScalarKind::Boolean,
        SmithyShape::Byte(_) | SmithyShape::Short(_) | SmithyShape::Integer(_) => {
            ScalarKind::Integer
        }
        SmithyShape::Long(_) | SmithyShape::BigInteger(_) => ScalarKind::Long,
        SmithyShape::Float(_) => ScalarKind::Float,
        SmithyShape::Double(_) | SmithyShape::BigDecimal(_) => ScalarKind::Double,
        SmithyShape::Timestamp(_) => ScalarKind::Timestamp,
        SmithyShape::Blob(_) => ScalarKind::Blob,
        SmithyShape::Document(_) => ScalarKind::Document,
        _ => ScalarKind::String,
    }
}

fn prelude_scalar(name: &str) -> Option<ScalarKind> {
    let scalar = match name.strip_prefix("Primitive").unwrap_or(name) {
        "String" => ScalarKind::String,
        "Boolean" => ScalarKind::Boolean,
        "Byte" | "Short" | "Integer" => ScalarKind::Integer,
        "Long" | "BigInteger" => ScalarKind::Long,
        "Float" => ScalarKind::Float,
        "Double" | "BigDecimal" => ScalarKind::Double,
        "Timestamp" => ScalarKind::Timestamp,
        "Blob" => ScalarKind::Blob,
        "Document" => ScalarKind::Document,
        _ => return None,
    };
    Some(scalar)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::shape::ShapeKind;

    const BOOKS: &str = r#"{
        "smithy": "2.0",
        "shapes": {
            "com.example.books#BookService": {
                "type": "service",
                "traits": { "aws.api#service": { "sdkId": "Books" } }
            },
            "com.example.books#CreateBook": {
                "type": "operation",
                "input": { "target": "com.example.books#CreateBookRequest" },
                "output": { "target": "com.example.books#CreateBookResponse" },
                "errors": [ { "target": "com.example.books#BookExists" } ]
            },
            "com.example.books#DeleteBook": {
                "type": "operation",
                "input": { "target": "com.example.books#DeleteBookRequest" },
                "output": { "target": "smithy.api#Unit" }
            },
            "com.example.books#CreateBookRequest": {
                "type": "structure",
                "members": {
                    "Title": {
                        "target": "smithy.api#String",
                        "traits": { "smithy.api#required": {} }
                    },
                    "Pages": { "target": "smithy.api#Integer" },
                    "Genre": { "target": "com.example.books#Genre" },
                    "Chapters": { "target": "com.example.books#ChapterList" }
                }
            },
            "com.example.books#CreateBookResponse": {
                "type": "structure",
                "members": { "BookArn": { "target": "smithy.api#String" } }
            },
            "com.example.books#DeleteBookRequest": {
                "type": "structure",
                "members": { "Title": { "target": "smithy.api#String" } }
            },
            "com.example.books#ChapterList": {
                "type": "list",
                "member": { "target": "com.example.books#Chapter" }
            },
            "com.example.books#Chapter": {
                "type": "structure",
                "members": { "Name": { "target": "smithy.api#String" } },
                "traits": { "smithy.api#documentation": "A chapter." }
            },
            "com.example.books#Genre": {
                "type": "enum",
                "members": {
                    "FICTION": {
                        "target": "smithy.api#Unit",
                        "traits": { "smithy.api#enumValue": "fiction" }
                    },
                    "POETRY": { "target": "smithy.api#Unit" }
                }
            },
            "com.example.books#BookExists": {
                "type": "structure",
                "members": {},
                "traits": { "smithy.api#error": "client", "smithy.api#httpError": 409 }
            }
        }
    }"#;

    #[test]
    fn test_should_load_service_and_operations() {
        let api = load_smithy_json(BOOKS).expect("load");
        assert_eq!(api.service_id, "Books");
        assert_eq!(
            api.operation_names().collect::<Vec<_>>(),
            vec!["CreateBook", "DeleteBook"]
        );
        let delete = api.operation("DeleteBook").expect("delete");
        assert!(delete.output.is_none());

        let create = api.operation("CreateBook").expect("create");
        assert_eq!(create.errors[0].code, "BookExists");
        assert_eq!(create.errors[0].http_status, Some(409));
    }

    #[test]
    fn test_should_map_prelude_targets_to_scalars() {
        let api = load_smithy_json(BOOKS).expect("load");
        let pages = api.shape_by_name("Integer").expect("prelude integer");
        assert_eq!(
            pages.kind,
            ShapeKind::Scalar {
                scalar: ScalarKind::Integer
            }
        );
        let request = api.shape_by_name("CreateBookRequest").expect("request");
        assert!(request.required.contains("Title"));
        assert_eq!(api.target(request.member("Title").expect("title")).name, "String");
    }

    #[test]
    fn test_should_lift_enum_values_and_documentation() {
        let api = load_smithy_json(BOOKS).expect("load");
        let genre = api.shape_by_name("Genre").expect("genre");
        assert!(genre.is_enum);
        assert_eq!(genre.enum_values, vec!["fiction", "POETRY"]);
        let chapter = api.shape_by_name("Chapter").expect("chapter");
        assert_eq!(chapter.documentation.as_deref(), Some("A chapter."));
        assert!(api.shape_by_name("CreateBookResponse").expect("out").used_as_output);
    }

    #[test]
    fn test_should_reject_dangling_targets() {
        let doc = r#"{
            "smithy": "2.0",
            "shapes": {
                "com.example#Book": {
                    "type": "structure",
                    "members": { "Author": { "target": "com.example#Author" } }
                }
            }
        }"#;
        let err = load_smithy_json(doc).expect_err("should fail");
        assert!(matches!(err, ApiError::AbsentShape { .. }));
    }

    #[test]
    fn test_should_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(BOOKS.as_bytes()).expect("write");
        let api = load_smithy_file(file.path()).expect("load");
        assert!(api.operation("CreateBook").is_some());

        let missing = load_smithy_file(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ApiError::Io { .. })));
    }
}
