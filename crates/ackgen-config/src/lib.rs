//! Generator override configuration for ackgen.
//!
//! The configuration is a declarative document (usually `generator.yaml`)
//! that steers model construction: which resources and operations to skip,
//! how operations map to resources, how members are renamed, and per-field
//! overrides such as secret redaction, alternative sources and explicit types.

pub mod config;
pub mod error;
pub mod field;
pub mod operation;
pub mod resource;
pub mod validate;

pub use config::{DEFAULT_PRINT_ORDER_BY, DEFAULT_TAG_FIELD_PATH, GeneratorConfig, IgnoreSpec};
pub use error::{ConfigError, ConfigResult};
pub use field::{
    CustomFieldConfig, CustomShape, FieldConfig, FieldIntent, PrintFieldConfig, ReferencesConfig,
    SourceFieldConfig,
};
pub use operation::OperationConfig;
pub use resource::{
    OperationRenamesConfig, PrintConfig, RenamesConfig, ResourceConfig, TagConfig,
    UnpackAttributesMapConfig,
};
pub use validate::validate;
