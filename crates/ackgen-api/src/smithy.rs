//! Smithy JSON AST document types.
//!
//! Only the parts of the Smithy 2.0 JSON AST that feed the shape arena are
//! modeled. Traits stay as raw JSON values and are interpreted by the loader.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Raw trait table of a shape or member.
pub type Traits = BTreeMap<String, serde_json::Value>;

/// Top-level Smithy model document.
#[derive(Debug, Deserialize)]
pub struct SmithyModel {
    /// Smithy version (e.g. "2.0").
    pub smithy: String,
    /// All shapes keyed by absolute shape id.
    #[serde(default)]
    pub shapes: BTreeMap<String, SmithyShape>,
}

impl SmithyModel {
    /// Short name of an absolute shape id.
    ///
    /// `com.example.books#BookTitle` becomes `BookTitle`.
    #[must_use]
    pub fn short_name(shape_id: &str) -> &str {
        shape_id.rsplit_once('#').map_or(shape_id, |(_, name)| name)
    }
}

/// A single Smithy shape.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SmithyShape {
    /// Structure shape.
    Structure(AggregateShape),
    /// Union shape, treated as a structure.
    Union(AggregateShape),
    /// Operation shape.
    Operation(OperationShape),
    /// Service shape.
    Service(SimpleShape),
    /// Resource shape.
    Resource(SimpleShape),
    /// Enum string shape.
    Enum(AggregateShape),
    /// Integer enum shape.
    IntEnum(AggregateShape),
    /// List shape.
    List(ListShape),
    /// Set shape (Smithy 1.0), treated as a list.
    Set(ListShape),
    /// Map shape.
    Map(MapShape),
    /// String shape.
    String(SimpleShape),
    /// Boolean shape.
    Boolean(SimpleShape),
    /// Byte shape.
    Byte(SimpleShape),
    /// Short shape.
    Short(SimpleShape),
    /// Integer shape.
    Integer(SimpleShape),
    /// Long shape.
    Long(SimpleShape),
    /// Big integer shape.
    BigInteger(SimpleShape),
    /// Float shape.
    Float(SimpleShape),
    /// Double shape.
    Double(SimpleShape),
    /// Big decimal shape.
    BigDecimal(SimpleShape),
    /// Timestamp shape.
    Timestamp(SimpleShape),
    /// Blob shape.
    Blob(SimpleShape),
    /// Document shape.
    Document(SimpleShape),
}

/// A shape described only by its traits.
#[derive(Debug, Default, Deserialize)]
pub struct SimpleShape {
    /// Traits applied to this shape.
    #[serde(default)]
    pub traits: Traits,
}

/// A shape with named members (structure, union, enum, intEnum).
#[derive(Debug, Default, Deserialize)]
pub struct AggregateShape {
    /// Members keyed by member name.
    #[serde(default)]
    pub members: BTreeMap<String, MemberShape>,
    /// Traits applied to this shape.
    #[serde(default)]
    pub traits: Traits,
}

/// A member of an aggregate shape.
#[derive(Debug, Deserialize)]
pub struct MemberShape {
    /// Absolute id of the target shape.
    pub target: String,
    /// Traits applied to this member.
    #[serde(default)]
    pub traits: Traits,
}

/// An operation shape.
#[derive(Debug, Deserialize)]
pub struct OperationShape {
    /// Input shape reference.
    pub input: Option<TargetRef>,
    /// Output shape reference.
    pub output: Option<TargetRef>,
    /// Declared errors.
    #[serde(default)]
    pub errors: Vec<TargetRef>,
    /// Traits applied to this shape.
    #[serde(default)]
    pub traits: Traits,
}

/// A bare reference to another shape.
#[derive(Debug, Deserialize)]
pub struct TargetRef {
    /// Absolute id of the referenced shape.
    pub target: String,
}

/// A list or set shape.
#[derive(Debug, Deserialize)]
pub struct ListShape {
    /// Element member.
    pub member: MemberShape,
    /// Traits applied to this shape.
    #[serde(default)]
    pub traits: Traits,
}

/// A map shape.
#[derive(Debug, Deserialize)]
pub struct MapShape {
    /// Key member.
    pub key: MemberShape,
    /// Value member.
    pub value: MemberShape,
    /// Traits applied to this shape.
    #[serde(default)]
    pub traits: Traits,
}
