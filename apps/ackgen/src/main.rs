//! ackgen - build resource models from API schemas.
//!
//! Loads a Smithy JSON schema and an optional generator configuration,
//! builds the resource model (or compares two versions of it) and prints the
//! result as JSON on stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! ackgen model --schema books.json --config generator.yaml
//! ackgen diff --schema-src v1alpha1.json --schema-dst v1.json --config-dst generator.yaml
//! ackgen validate --schema books.json --config generator.yaml
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |
//! | `ACKGEN_SERVICE` | *(empty)* | Service package name |
//! | `ACKGEN_API_VERSION` | `v1alpha1` | API version of built models |
//! | `ACKGEN_CONFLICT_SUFFIX` | `_SDK` | Suffix for type names colliding with resources |

mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::Cli;

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to `log_level`.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;
    let code = cli.command.run()?;
    std::process::exit(code);
}
