//! End-to-end tests for the ackgen model pipeline.
//!
//! Fixtures are Smithy JSON AST documents and generator configurations for
//! two versions of a small bookstore service, compiled into the test crate.
//!
//! ```text
//! cargo test -p ackgen-integration
//! ```

use std::collections::BTreeMap;
use std::sync::Once;

use ackgen_api::{Api, load_smithy_json};
use ackgen_config::GeneratorConfig;
use ackgen_model::{Model, ModelOptions, VersionManager};

static INIT: Once = Once::new();

/// Schema of the first bookstore version.
pub const BOOKSTORE_V1ALPHA1: &str = include_str!("../fixtures/bookstore-v1alpha1.json");
/// Schema of the second bookstore version; `Author` gains an `Email` member.
pub const BOOKSTORE_V1: &str = include_str!("../fixtures/bookstore-v1.json");
/// Configuration of the first version.
pub const GENERATOR_V1ALPHA1: &str = include_str!("../fixtures/generator-v1alpha1.yaml");
/// Configuration of the second version; renames `Year` and marks `Isbn` secret.
pub const GENERATOR_V1: &str = include_str!("../fixtures/generator-v1.yaml");

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Parse a schema fixture.
#[must_use]
pub fn load_api(text: &str) -> Api {
    init_tracing();
    load_smithy_json(text).unwrap_or_else(|e| panic!("failed to load schema fixture: {e}"))
}

/// Parse a configuration fixture.
#[must_use]
pub fn load_config(text: &str) -> GeneratorConfig {
    GeneratorConfig::from_yaml_str(text).unwrap_or_else(|e| panic!("failed to parse configuration fixture: {e}"))
}

/// Schema and configuration fixtures of `version`.
#[must_use]
pub fn bookstore_inputs(version: &str) -> (Api, GeneratorConfig) {
    match version {
        "v1alpha1" => (load_api(BOOKSTORE_V1ALPHA1), load_config(GENERATOR_V1ALPHA1)),
        "v1" => (load_api(BOOKSTORE_V1), load_config(GENERATOR_V1)),
        other => panic!("no bookstore fixture for {other}"),
    }
}

/// Model of the bookstore at `version`.
#[must_use]
pub fn bookstore_model(version: &str) -> Model {
    let (api, config) = bookstore_inputs(version);
    let options = ModelOptions::builder()
        .service_package_name("bookstore".to_owned())
        .api_version(version.to_owned())
        .build();
    Model::new(api, config, options).unwrap_or_else(|e| panic!("failed to build {version} model: {e}"))
}

/// Version manager over both bookstore versions, with `v1` as the hub.
#[must_use]
pub fn bookstore_versions() -> VersionManager {
    let versions = BTreeMap::from([
        ("v1alpha1".to_owned(), bookstore_inputs("v1alpha1")),
        ("v1".to_owned(), bookstore_inputs("v1")),
    ]);
    VersionManager::new("v1", versions, &ModelOptions::default())
        .unwrap_or_else(|e| panic!("failed to build version manager: {e}"))
}

mod test_fieldpath;
mod test_model;
mod test_multiversion;
