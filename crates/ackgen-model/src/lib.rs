//! Resource model construction for ackgen.
//!
//! Turns an API schema ([`ackgen_api::Api`]) and its generator configuration
//! ([`ackgen_config::GeneratorConfig`]) into a [`Model`]: the resources the
//! schema's Create operations surface, each split into user-settable Spec
//! fields and server-reported Status fields, together with the named type
//! and enum definitions those fields use.
//!
//! - [`names`] and [`inflect`]: identifier spelling and pluralization
//! - [`op`]: operation classification into resource roles
//! - [`sdk`]: the schema view the builder queries
//! - [`field`], [`resource`] and [`typedef`]: the model's building blocks
//! - [`printer`]: listing columns
//! - [`multiversion`]: comparing resources across API versions

mod builder;
pub mod error;
pub mod field;
pub mod inflect;
pub mod model;
pub mod multiversion;
pub mod names;
pub mod op;
pub mod options;
pub mod printer;
pub mod resource;
pub mod sdk;
pub mod typedef;

pub use error::{ModelError, ModelResult};
pub use field::{Field, FieldType, reference_field_name};
pub use model::Model;
pub use multiversion::{DiffError, DiffResult, VersionManager};
pub use names::Names;
pub use op::{OpType, OperationMap, classify};
pub use options::ModelOptions;
pub use printer::{ColumnOrder, PrinterColumn};
pub use resource::{Resource, ResourceOps};
pub use sdk::SdkApi;
pub use typedef::{Attr, EnumDef, EnumValue, TypeDef, TypeRegistry};
