//! Error types for model construction.

use ackgen_api::ApiError;

/// Errors raised while building a resource model.
///
/// Every variant names the resource and field path (or shape) involved so a
/// failed build can be traced back to the schema/configuration pairing.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A shape that must exist for the build is missing.
    #[error("resource {resource}: absent shape for {what}")]
    AbsentShape {
        /// Resource being built.
        resource: String,
        /// What was being looked up.
        what: String,
    },

    /// A configured field source does not resolve against the named operation.
    #[error("resource {resource}: field {field} sources {operation}:{path}, which does not resolve")]
    UnknownFieldSource {
        /// Resource being built.
        resource: String,
        /// Configured field path.
        field: String,
        /// Source operation.
        operation: String,
        /// Source member path.
        path: String,
    },

    /// A custom list-of/map-of field names a shape that does not exist.
    #[error("custom field shape {shape:?} does not exist")]
    UnknownCustomShape {
        /// Missing element or value shape name.
        shape: String,
    },

    /// A structure shape has no members and no configured fallback type.
    #[error("resource {resource}: field {field} has empty structure shape {shape} and no type override")]
    AmbiguousStructureShape {
        /// Resource being built.
        resource: String,
        /// Field path.
        field: String,
        /// Structure shape name.
        shape: String,
    },

    /// A nested override names a parent field that cannot be found.
    #[error("resource {resource}: cannot find parent field of {field}")]
    MissingParentField {
        /// Resource being built.
        resource: String,
        /// Field path of the override.
        field: String,
    },

    /// A nested override's owning type definition cannot be found.
    #[error("resource {resource}: cannot find type definition {type_name:?} owning {field}")]
    MissingTypeDefinition {
        /// Resource being built.
        resource: String,
        /// Field path of the override.
        field: String,
        /// Type name that was looked up.
        type_name: String,
    },

    /// A type definition has no attribute for an overridden member.
    #[error("resource {resource}: type definition {type_name} has no attribute {attribute} for {field}")]
    MissingAttribute {
        /// Resource being built.
        resource: String,
        /// Field path of the override.
        field: String,
        /// Type definition name.
        type_name: String,
        /// Missing member name.
        attribute: String,
    },

    /// A structure shape transitively contains itself.
    #[error("resource {resource}: shape {shape} at {field} contains itself")]
    CyclicSchema {
        /// Resource being built.
        resource: String,
        /// Field path where the cycle closes.
        field: String,
        /// Shape that repeats.
        shape: String,
    },

    /// An input or output wrapper path does not lead to a structure.
    #[error("operation {operation}: wrapper field path {path} is invalid: {reason}")]
    InvalidWrapperField {
        /// Operation whose wrapper is configured.
        operation: String,
        /// Configured wrapper path.
        path: String,
        /// Why the path was rejected.
        reason: String,
    },

    /// A dotted custom field cannot be attached to its parent.
    #[error("resource {resource}: custom nested field {field} is invalid: {reason}")]
    InvalidCustomNestedField {
        /// Resource being built.
        resource: String,
        /// Configured field path.
        field: String,
        /// Why the field was rejected.
        reason: String,
    },

    /// A reference field name cannot be derived from the configured field.
    #[error("resource {resource}: cannot derive reference field name from {field}")]
    InvalidReferenceField {
        /// Resource being built.
        resource: String,
        /// Configured field path.
        field: String,
    },

    /// A type override string is not understood.
    #[error("unsupported type override {type_name:?}")]
    UnsupportedTypeOverride {
        /// Configured type string.
        type_name: String,
    },

    /// A printed field has a type that cannot be shown as a column.
    #[error("resource {resource}: field {field} of type {field_type} cannot be printed")]
    UnprintableField {
        /// Resource being built.
        resource: String,
        /// Field path.
        field: String,
        /// Generated type of the field.
        field_type: String,
    },

    /// A resource orders its columns by an unknown attribute.
    #[error("resource {resource}: unknown column order {order_by:?}, expected name, type, jsonpath or index")]
    UnknownColumnOrder {
        /// Resource being built.
        resource: String,
        /// Configured order.
        order_by: String,
    },

    /// Schema error.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Convenience result type for model construction.
pub type ModelResult<T> = Result<T, ModelError>;
