//! Shape arena.
//!
//! Every [`Shape`] of a schema lives in a single [`Api`] and is addressed by a
//! stable [`ShapeId`]. Structure members, list elements and map keys/values
//! hold [`ShapeRef`]s carrying their own local name plus the id of the target
//! shape, so the same shape can be reached through many references and a
//! self-referential structure never produces an owning cycle.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// Stable index of a [`Shape`] inside its owning [`Api`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ShapeId(u32);

impl ShapeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Position of the shape in the arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Scalar shape subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    /// UTF-8 string.
    String,
    /// Boolean.
    Boolean,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Point in time.
    Timestamp,
    /// Opaque bytes.
    Blob,
    /// Untyped document value.
    Document,
}

impl ScalarKind {
    /// Schema type name of this scalar.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Timestamp => "timestamp",
            Self::Blob => "blob",
            Self::Document => "document",
        }
    }
}

/// The structural kind of a shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeKind {
    /// A scalar value.
    Scalar {
        /// Scalar subtype.
        scalar: ScalarKind,
    },
    /// A structure with named members, kept sorted by member name.
    Structure {
        /// Member name to member reference.
        members: BTreeMap<String, ShapeRef>,
    },
    /// A homogeneous list.
    List {
        /// Element reference.
        member: ShapeRef,
    },
    /// A map from keys to values.
    Map {
        /// Key reference.
        key: ShapeRef,
        /// Value reference.
        value: ShapeRef,
    },
}

impl ShapeKind {
    /// Schema type name of this kind (`structure`, `list`, `map` or the scalar name).
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Scalar { scalar } => scalar.as_str(),
            Self::Structure { .. } => "structure",
            Self::List { .. } => "list",
            Self::Map { .. } => "map",
        }
    }
}

/// A node in the schema graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    /// Declared name of the shape.
    pub name: String,
    /// Structural kind.
    pub kind: ShapeKind,
    /// Whether this is a string shape with a closed value set.
    pub is_enum: bool,
    /// Allowed values when `is_enum` is set.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// Whether the shape describes an error returned by operations.
    pub is_exception: bool,
    /// HTTP status associated with an exception shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    /// Whether any operation uses this shape as its output.
    pub used_as_output: bool,
    /// Names of members marked as required.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub required: BTreeSet<String>,
    /// Documentation text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl Shape {
    /// Create a shape with the given name and kind and no flags set.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ShapeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_enum: false,
            enum_values: Vec::new(),
            is_exception: false,
            http_status: None,
            used_as_output: false,
            required: BTreeSet::new(),
            documentation: None,
        }
    }

    /// Create a scalar shape.
    #[must_use]
    pub fn scalar(name: impl Into<String>, scalar: ScalarKind) -> Self {
        Self::new(name, ShapeKind::Scalar { scalar })
    }

    /// Schema type name of the shape.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Whether the shape is a structure.
    #[must_use]
    pub fn is_structure(&self) -> bool {
        matches!(self.kind, ShapeKind::Structure { .. })
    }

    /// Members of a structure shape, `None` for every other kind.
    #[must_use]
    pub fn members(&self) -> Option<&BTreeMap<String, ShapeRef>> {
        match &self.kind {
            ShapeKind::Structure { members } => Some(members),
            _ => None,
        }
    }

    /// Look up a structure member by exact name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&ShapeRef> {
        self.members().and_then(|members| members.get(name))
    }

    /// Look up a structure member ignoring ASCII case.
    ///
    /// Returns the declared member name alongside the reference.
    #[must_use]
    pub fn member_ignore_case(&self, name: &str) -> Option<(&str, &ShapeRef)> {
        let members = self.members()?;
        if let Some((key, member)) = members.get_key_value(name) {
            return Some((key.as_str(), member));
        }
        members
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(key, member)| (key.as_str(), member))
    }
}

/// A named reference to a [`Shape`].
///
/// `name` is the local name the reference is known by, which may differ from
/// the target shape's declared name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ShapeRef {
    /// Local name of the reference.
    pub name: String,
    /// Target shape.
    pub shape: ShapeId,
}

impl ShapeRef {
    /// Create a reference.
    #[must_use]
    pub fn new(name: impl Into<String>, shape: ShapeId) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }
}

/// An error an operation declares it may return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRef {
    /// Error code, the exception shape name.
    pub code: String,
    /// Exception shape.
    pub shape: ShapeId,
    /// HTTP status, when the schema declares one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
}

/// A named API call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Operation identifier, e.g. `CreateBook`.
    pub name: String,
    /// Input root, absent for operations without input.
    pub input: Option<ShapeRef>,
    /// Output root, absent for operations without output.
    pub output: Option<ShapeRef>,
    /// Declared errors.
    pub errors: Vec<ErrorRef>,
    /// Documentation text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

/// An in-memory schema: the shape arena plus the operation table.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Api {
    /// Service identifier.
    pub service_id: String,
    shapes: Vec<Shape>,
    #[serde(skip)]
    index: BTreeMap<String, ShapeId>,
    operations: BTreeMap<String, Operation>,
}

impl Api {
    /// Create an empty schema for the given service.
    #[must_use]
    pub fn new(service_id: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            ..Self::default()
        }
    }

    /// Add a shape to the arena and index it by name.
    ///
    /// A previously indexed shape with the same name stays in the arena, so
    /// existing references to it remain valid, but is no longer found by name.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = ShapeId::from_index(self.shapes.len());
        self.index.insert(shape.name.clone(), id);
        self.shapes.push(shape);
        id
    }

    /// Add or replace an operation.
    pub fn add_operation(&mut self, operation: Operation) {
        self.operations.insert(operation.name.clone(), operation);
    }

    /// Shape stored under `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this arena.
    #[must_use]
    pub fn shape(&self, id: ShapeId) -> &Shape {
        &self.shapes[id.index()]
    }

    /// Mutable access to the shape stored under `id`.
    #[must_use]
    pub fn shape_mut(&mut self, id: ShapeId) -> &mut Shape {
        &mut self.shapes[id.index()]
    }

    /// Target shape of a reference.
    #[must_use]
    pub fn target(&self, shape_ref: &ShapeRef) -> &Shape {
        self.shape(shape_ref.shape)
    }

    /// Id of the shape indexed under `name`.
    #[must_use]
    pub fn shape_id(&self, name: &str) -> Option<ShapeId> {
        self.index.get(name).copied()
    }

    /// Shape indexed under `name`.
    #[must_use]
    pub fn shape_by_name(&self, name: &str) -> Option<&Shape> {
        self.shape_id(name).map(|id| self.shape(id))
    }

    /// All indexed shape names in sorted order.
    pub fn shape_names(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// All indexed shapes in name order.
    pub fn shapes(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.index.values().map(|&id| (id, self.shape(id)))
    }

    /// Remove `name` from the name index. Returns the id it pointed to.
    pub fn unindex_shape(&mut self, name: &str) -> Option<ShapeId> {
        self.index.remove(name)
    }

    /// Operation with the given identifier.
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.get(name)
    }

    /// All operations in identifier order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.values()
    }

    /// All operation identifiers in sorted order.
    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    /// Follow list elements and map values down to the first non-collection reference.
    #[must_use]
    pub fn container_ref<'a>(&'a self, shape_ref: &'a ShapeRef) -> &'a ShapeRef {
        let mut current = shape_ref;
        loop {
            match &self.target(current).kind {
                ShapeKind::List { member } => current = member,
                ShapeKind::Map { value, .. } => current = value,
                _ => return current,
            }
        }
    }
}
