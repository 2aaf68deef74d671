//! In-memory API schemas for ackgen.
//!
//! This crate holds the raw material the model builder works from:
//!
//! - [`shape`]: the shape arena ([`Api`], [`Shape`], [`ShapeRef`], [`Operation`])
//! - [`builder`]: name-based assembly of an [`Api`] with reference resolution
//! - [`smithy`] and [`loader`]: the Smithy JSON AST document and its conversion
//! - [`fieldpath`]: dotted field paths and their resolution against shapes
//! - schema-wide ignore rules via [`Api::apply_ignore_rules`]

pub mod builder;
pub mod error;
pub mod fieldpath;
mod ignore;
pub mod loader;
pub mod shape;
pub mod smithy;

pub use builder::ApiBuilder;
pub use error::{ApiError, ApiResult};
pub use fieldpath::{CaseSensitivity, FieldPath};
pub use loader::{load_smithy_file, load_smithy_json};
pub use shape::{Api, ErrorRef, Operation, ScalarKind, Shape, ShapeId, ShapeKind, ShapeRef};
