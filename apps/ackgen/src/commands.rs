use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};

use ackgen_api::{Api, load_smithy_file};
use ackgen_config::{GeneratorConfig, validate};
use ackgen_model::multiversion::ResourceDelta;
use ackgen_model::{Model, ModelOptions, VersionManager};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};

/// Command-line interface for ackgen.
#[derive(Debug, Parser)]
#[command(name = "ackgen", version, about = "Build resource models from API schemas", long_about = None)]
pub struct Cli {
    /// Log level filter, used when `RUST_LOG` is unset
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the resource model of a schema and print it as JSON
    Model {
        /// Smithy JSON AST schema
        #[arg(short, long)]
        schema: PathBuf,

        /// Generator configuration (YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// API version of the model
        #[arg(long, env = "ACKGEN_API_VERSION", default_value = ackgen_model::options::DEFAULT_API_VERSION)]
        api_version: String,
    },
    /// Compare the resources of two schema versions and print the deltas as JSON
    Diff {
        /// Source version schema
        #[arg(long)]
        schema_src: PathBuf,

        /// Source version configuration
        #[arg(long)]
        config_src: Option<PathBuf>,

        /// Source version name
        #[arg(long, default_value = "v1alpha1")]
        version_src: String,

        /// Destination version schema
        #[arg(long)]
        schema_dst: PathBuf,

        /// Destination version configuration
        #[arg(long)]
        config_dst: Option<PathBuf>,

        /// Destination version name
        #[arg(long, default_value = "v1")]
        version_dst: String,
    },
    /// Check that a configuration only names operations the schema defines
    Validate {
        /// Smithy JSON AST schema
        #[arg(short, long)]
        schema: PathBuf,

        /// Generator configuration (YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Outcome of comparing one resource.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum DiffOutcome {
    Delta(ResourceDelta),
    Error { error: String },
}

impl Commands {
    /// Run the command, returning the process exit code.
    pub fn run(self) -> Result<i32> {
        match self {
            Self::Model {
                schema,
                config,
                api_version,
            } => {
                let api = load_schema(&schema)?;
                let config = load_config(config.as_deref())?;
                let options = ModelOptions {
                    api_version,
                    ..ModelOptions::from_env()
                };
                let model = Model::new(api, config, options)
                    .with_context(|| format!("failed to build model for {}", schema.display()))?;
                print_json(&model)?;
                Ok(0)
            }
            Self::Diff {
                schema_src,
                config_src,
                version_src,
                schema_dst,
                config_dst,
                version_dst,
            } => {
                let versions = BTreeMap::from([
                    (
                        version_src.clone(),
                        (load_schema(&schema_src)?, load_config(config_src.as_deref())?),
                    ),
                    (
                        version_dst.clone(),
                        (load_schema(&schema_dst)?, load_config(config_dst.as_deref())?),
                    ),
                ]);
                let manager = VersionManager::new(&version_dst, versions, &ModelOptions::from_env())
                    .context("failed to build version models")?;
                let deltas = manager
                    .compare_versions(&version_src, &version_dst)
                    .with_context(|| format!("failed to compare {version_src} with {version_dst}"))?;
                let outcomes: BTreeMap<String, DiffOutcome> = deltas
                    .into_iter()
                    .map(|(resource, delta)| {
                        let outcome = match delta {
                            Ok(delta) => DiffOutcome::Delta(delta),
                            Err(err) => DiffOutcome::Error {
                                error: err.to_string(),
                            },
                        };
                        (resource, outcome)
                    })
                    .collect();
                print_json(&outcomes)?;
                Ok(0)
            }
            Self::Validate { schema, config } => {
                let api = load_schema(&schema)?;
                let config = load_config(Some(&config))?;
                let operations: BTreeSet<String> =
                    api.operation_names().map(ToOwned::to_owned).collect();
                let errors = validate(&config, &operations);
                if errors.is_empty() {
                    info!(operations = operations.len(), "configuration is valid");
                    return Ok(0);
                }
                for err in &errors {
                    error!("{err}");
                }
                let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
                print_json(&messages)?;
                Ok(1)
            }
        }
    }
}

fn load_schema(path: &Path) -> Result<Api> {
    load_smithy_file(path).with_context(|| format!("failed to load schema {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::from_path(path)
            .with_context(|| format!("failed to load configuration {}", path.display())),
        None => Ok(GeneratorConfig::default()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("failed to serialize output")?;
    writeln!(stdout).context("failed to write output")?;
    Ok(())
}
