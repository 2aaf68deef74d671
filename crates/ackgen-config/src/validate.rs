//! Configuration validation against a schema's operation set.

use std::collections::BTreeSet;

use crate::config::GeneratorConfig;
use crate::error::ConfigError;

const MAX_LISTED_OPERATIONS: usize = 10;

/// Check that every operation named by renames or the ignore list exists.
///
/// Returns every problem found rather than stopping at the first. Resource and
/// shape names are not checked: resources may be named freely and ignored
/// shapes may be absent from some schema versions.
#[must_use]
pub fn validate(config: &GeneratorConfig, operations: &BTreeSet<String>) -> Vec<ConfigError> {
    let available = format_available(operations);
    let mut errors = Vec::new();

    for (resource, resource_config) in &config.resources {
        let Some(renames) = &resource_config.renames else {
            continue;
        };
        for operation in renames.operations.keys() {
            if !operations.contains(operation) {
                errors.push(ConfigError::UnknownRenameOperation {
                    resource: resource.clone(),
                    operation: operation.clone(),
                    available: available.clone(),
                });
            }
        }
    }

    for operation in &config.ignore.operations {
        if !operations.contains(operation) {
            errors.push(ConfigError::UnknownIgnoredOperation {
                operation: operation.clone(),
                available: available.clone(),
            });
        }
    }

    errors
}

fn format_available(operations: &BTreeSet<String>) -> String {
    let listed: Vec<&str> = operations
        .iter()
        .take(MAX_LISTED_OPERATIONS)
        .map(String::as_str)
        .collect();
    if operations.len() <= MAX_LISTED_OPERATIONS {
        listed.join(", ")
    } else {
        format!("{}, ... ({} total)", listed.join(", "), operations.len())
    }
}
