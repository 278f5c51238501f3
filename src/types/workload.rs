// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::readiness::RUNNING_PHASE;
use crate::error::LoadError;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use std::collections::BTreeMap;
use std::fmt;

pub type Labels = BTreeMap<String, String>;

/// A deployment as loaded from the manifest, the desired state of the rollout.
#[derive(Clone, Debug)]
pub struct WorkloadDescriptor {
    name: String,
    deployment: Deployment,
}

impl WorkloadDescriptor {
    pub fn from_deployment(deployment: Deployment) -> Result<Self, LoadError> {
        let name = deployment
            .metadata
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .ok_or(LoadError::MissingName)?;

        Ok(Self { name, deployment })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Labels the deployment uses to select its pods
    pub fn selector_labels(&self) -> Labels {
        self.deployment
            .spec
            .as_ref()
            .and_then(|s| s.selector.match_labels.clone())
            .unwrap_or_default()
    }

    /// Labels stamped onto pods created from the template
    pub fn template_labels(&self) -> Labels {
        template_labels(&self.deployment)
    }

    /// The full deployment sent to the API server
    pub fn payload(&self) -> &Deployment {
        &self.deployment
    }
}

/// Identity of a deployment as returned by the API server.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceHandle {
    pub name: String,
    pub generation: Option<i64>,
    pub resource_version: Option<String>,
    pub template_labels: Labels,
}

impl From<&Deployment> for ResourceHandle {
    fn from(deployment: &Deployment) -> Self {
        Self {
            name: deployment.name_any(),
            generation: deployment.metadata.generation,
            resource_version: deployment.resource_version(),
            template_labels: template_labels(deployment),
        }
    }
}

fn template_labels(deployment: &Deployment) -> Labels {
    deployment
        .spec
        .as_ref()
        .and_then(|s| s.template.metadata.as_ref())
        .and_then(|m| m.labels.clone())
        .unwrap_or_default()
}

/// Pod phase. Phases unknown to this version are kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnitPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
    Other(String),
}

impl UnitPhase {
    pub fn parse(phase: &str) -> Self {
        match phase {
            "Pending" => UnitPhase::Pending,
            RUNNING_PHASE => UnitPhase::Running,
            "Succeeded" => UnitPhase::Succeeded,
            "Failed" => UnitPhase::Failed,
            "Unknown" => UnitPhase::Unknown,
            other => UnitPhase::Other(other.to_string()),
        }
    }

    pub fn is_running(&self) -> bool {
        *self == UnitPhase::Running
    }
}

impl fmt::Display for UnitPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitPhase::Pending => f.write_str("Pending"),
            UnitPhase::Running => f.write_str(RUNNING_PHASE),
            UnitPhase::Succeeded => f.write_str("Succeeded"),
            UnitPhase::Failed => f.write_str("Failed"),
            UnitPhase::Unknown => f.write_str("Unknown"),
            UnitPhase::Other(s) => f.write_str(s),
        }
    }
}

/// Snapshot of a single pod.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionUnit {
    pub name: String,
    pub phase: UnitPhase,
    pub labels: Labels,
}

impl From<&Pod> for ExecutionUnit {
    fn from(pod: &Pod) -> Self {
        let phase = pod
            .status
            .as_ref()
            .and_then(|s| s.phase.as_deref())
            .map(UnitPhase::parse)
            .unwrap_or(UnitPhase::Unknown);

        Self {
            name: pod.name_any(),
            phase,
            labels: pod.labels().clone(),
        }
    }
}
