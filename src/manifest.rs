// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Manifest loading and kind dispatch.

use crate::error::LoadError;
use crate::types::WorkloadDescriptor;
use k8s_openapi::api::apps::v1::Deployment;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, instrument};

/// Source of the workload to roll out.
pub trait ManifestLoader {
    fn load(&self, path: &Path) -> Result<WorkloadDescriptor, LoadError>;
}

/// Reads a single YAML (or JSON) document from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileManifestLoader;

impl ManifestLoader for FileManifestLoader {
    #[instrument(skip(self))]
    fn load(&self, path: &Path) -> Result<WorkloadDescriptor, LoadError> {
        let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.display().to_string(),
            source,
        })?;

        match WorkloadManifest::decode(&contents)? {
            WorkloadManifest::Deployment(deployment) => {
                debug!("Decoded apps/v1 Deployment");
                WorkloadDescriptor::from_deployment(*deployment)
            }
            WorkloadManifest::Unsupported { api_version, kind } => {
                Err(LoadError::UnsupportedKind { api_version, kind })
            }
        }
    }
}

/// Decoded manifest, one variant per supported workload kind.
#[derive(Debug)]
pub enum WorkloadManifest {
    Deployment(Box<Deployment>),
    Unsupported { api_version: String, kind: String },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeMeta {
    #[serde(default)]
    api_version: String,
    #[serde(default)]
    kind: String,
}

impl WorkloadManifest {
    pub fn decode(contents: &str) -> Result<Self, LoadError> {
        let value: serde_yaml::Value = serde_yaml::from_str(contents)?;
        let type_meta: TypeMeta = serde_yaml::from_value(value.clone())?;

        match (type_meta.api_version.as_str(), type_meta.kind.as_str()) {
            ("apps/v1", "Deployment") => {
                let deployment: Deployment = serde_yaml::from_value(value)?;
                Ok(WorkloadManifest::Deployment(Box::new(deployment)))
            }
            _ => Ok(WorkloadManifest::Unsupported {
                api_version: type_meta.api_version,
                kind: type_meta.kind,
            }),
        }
    }
}
