//! Name-based schema assembly.
//!
//! [`ApiBuilder`] collects shape and operation definitions that refer to each
//! other by name, then allocates arena ids and resolves every reference in one
//! pass. Forward references are therefore free, and a reference to a name
//! that is never defined is reported as [`ApiError::AbsentShape`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::{ApiError, ApiResult};
use crate::shape::{Api, ErrorRef, Operation, ScalarKind, Shape, ShapeId, ShapeKind, ShapeRef};

/// Kind of a shape definition, with references expressed as shape names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindDef {
    /// Scalar of the given subtype.
    Scalar(ScalarKind),
    /// Structure with `(member name, target shape name)` pairs.
    Structure(Vec<(String, String)>),
    /// List of the named element shape.
    List(String),
    /// Map from the named key shape to the named value shape.
    Map(String, String),
}

/// A shape definition awaiting resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeDef {
    /// Shape name.
    pub name: String,
    /// Structural kind.
    pub kind: KindDef,
    /// Closed value set for enum strings.
    pub enum_values: Option<Vec<String>>,
    /// HTTP status when the shape is an exception.
    pub exception: Option<Option<u16>>,
    /// Required member names.
    pub required: BTreeSet<String>,
    /// Documentation text.
    pub documentation: Option<String>,
}

impl ShapeDef {
    /// Create a definition with no flags set.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: KindDef) -> Self {
        Self {
            name: name.into(),
            kind,
            enum_values: None,
            exception: None,
            required: BTreeSet::new(),
            documentation: None,
        }
    }
}

/// An operation definition awaiting resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDef {
    /// Operation identifier.
    pub name: String,
    /// Input shape name.
    pub input: Option<String>,
    /// Output shape name.
    pub output: Option<String>,
    /// Declared error shape names.
    pub errors: Vec<String>,
    /// Documentation text.
    pub documentation: Option<String>,
}

/// Builder assembling an [`Api`] from name-based definitions.
#[derive(Debug, Clone, Default)]
pub struct ApiBuilder {
    service_id: String,
    shapes: Vec<ShapeDef>,
    operations: Vec<OperationDef>,
}

impl ApiBuilder {
    /// Start a schema for the given service.
    #[must_use]
    pub fn new(service_id: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            ..Self::default()
        }
    }

    /// Add a raw shape definition. Later definitions replace earlier ones of the same name.
    pub fn push_shape(&mut self, def: ShapeDef) {
        self.shapes.push(def);
    }

    /// Add a raw operation definition.
    pub fn push_operation(&mut self, def: OperationDef) {
        self.operations.push(def);
    }

    /// Whether a shape with this name has been defined.
    #[must_use]
    pub fn has_shape(&self, name: &str) -> bool {
        self.shapes.iter().any(|def| def.name == name)
    }

    /// Define a scalar shape.
    #[must_use]
    pub fn scalar(mut self, name: &str, scalar: ScalarKind) -> Self {
        self.push_shape(ShapeDef::new(name, KindDef::Scalar(scalar)));
        self
    }

    /// Define a string shape.
    #[must_use]
    pub fn string(self, name: &str) -> Self {
        self.scalar(name, ScalarKind::String)
    }

    /// Define an enum string shape.
    #[must_use]
    pub fn enumeration(mut self, name: &str, values: &[&str]) -> Self {
        let mut def = ShapeDef::new(name, KindDef::Scalar(ScalarKind::String));
        def.enum_values = Some(values.iter().map(|v| (*v).to_owned()).collect());
        self.push_shape(def);
        self
    }

    /// Define a structure from `(member, target)` pairs.
    #[must_use]
    pub fn structure(mut self, name: &str, members: &[(&str, &str)]) -> Self {
        let members = members
            .iter()
            .map(|(member, target)| ((*member).to_owned(), (*target).to_owned()))
            .collect();
        self.push_shape(ShapeDef::new(name, KindDef::Structure(members)));
        self
    }

    /// Define a list shape.
    #[must_use]
    pub fn list(mut self, name: &str, member: &str) -> Self {
        self.push_shape(ShapeDef::new(name, KindDef::List(member.to_owned())));
        self
    }

    /// Define a map shape.
    #[must_use]
    pub fn map(mut self, name: &str, key: &str, value: &str) -> Self {
        self.push_shape(ShapeDef::new(
            name,
            KindDef::Map(key.to_owned(), value.to_owned()),
        ));
        self
    }

    /// Define an exception structure with no members.
    #[must_use]
    pub fn exception(mut self, name: &str, http_status: Option<u16>) -> Self {
        let mut def = ShapeDef::new(name, KindDef::Structure(Vec::new()));
        def.exception = Some(http_status);
        self.push_shape(def);
        self
    }

    /// Mark members of an already defined structure as required.
    #[must_use]
    pub fn required(mut self, name: &str, members: &[&str]) -> Self {
        if let Some(def) = self.shapes.iter_mut().rev().find(|def| def.name == name) {
            def.required
                .extend(members.iter().map(|member| (*member).to_owned()));
        }
        self
    }

    /// Define an operation.
    #[must_use]
    pub fn operation(mut self, name: &str, input: Option<&str>, output: Option<&str>) -> Self {
        self.push_operation(OperationDef {
            name: name.to_owned(),
            input: input.map(str::to_owned),
            output: output.map(str::to_owned),
            errors: Vec::new(),
            documentation: None,
        });
        self
    }

    /// Declare errors on an already defined operation.
    #[must_use]
    pub fn errors(mut self, operation: &str, errors: &[&str]) -> Self {
        if let Some(def) = self
            .operations
            .iter_mut()
            .rev()
            .find(|def| def.name == operation)
        {
            def.errors.extend(errors.iter().map(|e| (*e).to_owned()));
        }
        self
    }

    /// Resolve every definition into an [`Api`].
    pub fn build(self) -> ApiResult<Api> {
        let mut defs: BTreeMap<String, ShapeDef> = BTreeMap::new();
        for def in self.shapes {
            defs.insert(def.name.clone(), def);
        }

        let ids: HashMap<&str, ShapeId> = defs
            .keys()
            .enumerate()
            .map(|(index, name)| (name.as_str(), ShapeId::from_index(index)))
            .collect();
        let resolve = |target: &str, owner: &str| -> ApiResult<ShapeRef> {
            ids.get(target)
                .map(|&id| ShapeRef::new(target, id))
                .ok_or_else(|| ApiError::AbsentShape {
                    shape: target.to_owned(),
                    referenced_by: owner.to_owned(),
                })
        };

        let mut shapes = Vec::with_capacity(defs.len());
        for def in defs.values() {
            let kind = match &def.kind {
                KindDef::Scalar(scalar) => ShapeKind::Scalar { scalar: *scalar },
                KindDef::Structure(members) => {
                    let mut resolved = BTreeMap::new();
                    for (member, target) in members {
                        resolved.insert(member.clone(), resolve(target, &def.name)?);
                    }
                    ShapeKind::Structure { members: resolved }
                }
                KindDef::List(member) => ShapeKind::List {
                    member: resolve(member, &def.name)?,
                },
                KindDef::Map(key, value) => ShapeKind::Map {
                    key: resolve(key, &def.name)?,
                    value: resolve(value, &def.name)?,
                },
            };
            let mut shape = Shape::new(def.name.clone(), kind);
            if let Some(values) = &def.enum_values {
                shape.is_enum = true;
                shape.enum_values.clone_from(values);
            }
            if let Some(status) = def.exception {
                shape.is_exception = true;
                shape.http_status = status;
            }
            shape.required.clone_from(&def.required);
            shape.documentation.clone_from(&def.documentation);
            shapes.push(shape);
        }

        let mut operations = Vec::with_capacity(self.operations.len());
        for def in &self.operations {
            let input = def
                .input
                .as_deref()
                .map(|name| resolve(name, &def.name))
                .transpose()?;
            let output = def
                .output
                .as_deref()
                .map(|name| resolve(name, &def.name))
                .transpose()?;
            if let Some(output) = &output {
                shapes[output.shape.index()].used_as_output = true;
            }
            let mut errors = Vec::with_capacity(def.errors.len());
            for name in &def.errors {
                let error = resolve(name, &def.name)?;
                errors.push(ErrorRef {
                    code: name.clone(),
                    shape: error.shape,
                    http_status: shapes[error.shape.index()].http_status,
                });
            }
            operations.push(Operation {
                name: def.name.clone(),
                input,
                output,
                errors,
                documentation: def.documentation.clone(),
            });
        }

        let mut api = Api::new(self.service_id);
        for shape in shapes {
            api.add_shape(shape);
        }
        for operation in operations {
            api.add_operation(operation);
        }
        Ok(api)
    }
}
