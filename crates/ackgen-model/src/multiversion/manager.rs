use std::collections::BTreeMap;

use ackgen_api::Api;
use ackgen_config::GeneratorConfig;
use tracing::{info, warn};

use super::delta::{ResourceDelta, compute_resource_delta};
use super::{DiffError, DiffResult};
use crate::error::ModelResult;
use crate::model::Model;
use crate::options::ModelOptions;

/// Models of every API version of one service.
///
/// One version is the hub the others (spokes) convert through. Each
/// version's model is built once, when the manager is created.
#[derive(Debug)]
pub struct VersionManager {
    hub_version: String,
    models: BTreeMap<String, Model>,
}

impl VersionManager {
    /// Build a model per entry of `versions`, keyed by API version.
    ///
    /// `options` applies to every version, with its API version replaced by
    /// the entry's key.
    pub fn new(
        hub_version: impl Into<String>,
        versions: BTreeMap<String, (Api, GeneratorConfig)>,
        options: &ModelOptions,
    ) -> DiffResult<Self> {
        let hub_version = hub_version.into();
        if !versions.contains_key(&hub_version) {
            return Err(DiffError::UnknownVersion {
                version: hub_version,
            });
        }
        let models = versions
            .into_iter()
            .map(|(version, (api, config))| {
                let options = ModelOptions {
                    api_version: version.clone(),
                    ..options.clone()
                };
                Model::new(api, config, options).map(|model| (version, model))
            })
            .collect::<ModelResult<BTreeMap<_, _>>>()?;
        info!(hub = %hub_version, versions = models.len(), "built version models");
        Ok(Self {
            hub_version,
            models,
        })
    }

    /// The hub version.
    #[must_use]
    pub fn hub_version(&self) -> &str {
        &self.hub_version
    }

    /// Every version except the hub, sorted.
    pub fn spoke_versions(&self) -> impl Iterator<Item = &str> {
        self.models
            .keys()
            .map(String::as_str)
            .filter(|version| *version != self.hub_version)
    }

    /// Model of `version`.
    #[must_use]
    pub fn model(&self, version: &str) -> Option<&Model> {
        self.models.get(version)
    }

    fn known_model(&self, version: &str) -> DiffResult<&Model> {
        self.model(version).ok_or_else(|| DiffError::UnknownVersion {
            version: version.to_owned(),
        })
    }

    /// Compare every resource present in both `source` and `destination`.
    ///
    /// Each resource's comparison succeeds or fails on its own; resources
    /// present in only one version are skipped.
    pub fn compare_versions(
        &self,
        source: &str,
        destination: &str,
    ) -> DiffResult<BTreeMap<String, DiffResult<ResourceDelta>>> {
        if source == destination {
            return Err(DiffError::SameVersion {
                version: source.to_owned(),
            });
        }
        let source_model = self.known_model(source)?;
        let destination_model = self.known_model(destination)?;

        let mut deltas = BTreeMap::new();
        for resource in source_model.resources() {
            let name = &resource.names.original;
            let Some(counterpart) = destination_model.resource(name) else {
                warn!(resource = %name, source, destination, "resource missing from destination version");
                continue;
            };
            let delta = compute_resource_delta(source_model, resource, destination_model, counterpart);
            if let Err(err) = &delta {
                warn!(resource = %name, error = %err, "failed to compare resource");
            }
            deltas.insert(name.clone(), delta);
        }
        for resource in destination_model.resources() {
            if source_model.resource(&resource.names.original).is_none() {
                warn!(resource = %resource.names.original, source, destination, "resource missing from source version");
            }
        }
        Ok(deltas)
    }
}
