// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::fmt;
use thiserror::Error;

/// Errors returned by a [`ControlPlaneClient`](crate::kubernetes::ControlPlaneClient).
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("resource already exists: {0}")]
    AlreadyExists(String),

    #[error("Kubernetes API error: {0}")]
    Api(kube::Error),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

impl From<kube::Error> for ClientError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp) if resp.code == 404 => ClientError::NotFound(resp.message),
            kube::Error::Api(resp) if resp.code == 409 && resp.reason == "AlreadyExists" => {
                ClientError::AlreadyExists(resp.message)
            }
            other => ClientError::Api(other),
        }
    }
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read manifest {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse manifest: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("unsupported resource kind {kind} ({api_version}), expected apps/v1 Deployment")]
    UnsupportedKind { api_version: String, kind: String },

    #[error("manifest has no metadata.name")]
    MissingName,
}

/// The rollout stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Load,
    Session,
    Reconcile,
    Readiness,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Config => f.write_str("config"),
            Stage::Load => f.write_str("load"),
            Stage::Session => f.write_str("session"),
            Stage::Reconcile => f.write_str("reconcile"),
            Stage::Readiness => f.write_str("readiness"),
        }
    }
}

#[derive(Error, Debug)]
pub enum RolloutError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to load manifest: {0}")]
    Load(#[from] LoadError),

    #[error("failed to connect to the cluster: {0}")]
    Session(String),

    #[error("failed to look up deployment {name}: {source}")]
    LookupFailure {
        name: String,
        #[source]
        source: ClientError,
    },

    #[error("deployment {name} was created concurrently: {source}")]
    CreateConflict {
        name: String,
        #[source]
        source: ClientError,
    },

    #[error("failed to create deployment {name}: {source}")]
    CreateFailure {
        name: String,
        #[source]
        source: ClientError,
    },

    #[error("failed to update deployment {name}: {source}")]
    UpdateFailure {
        name: String,
        #[source]
        source: ClientError,
    },

    #[error("invalid label selector: {0}")]
    SelectorInvalid(String),

    #[error("failed to list pods for selector {selector}: {source}")]
    ListFailure {
        selector: String,
        #[source]
        source: ClientError,
    },

    #[error("{stage} cancelled")]
    Cancelled { stage: Stage },
}

impl RolloutError {
    /// The stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            RolloutError::Config(_) => Stage::Config,
            RolloutError::Load(_) => Stage::Load,
            RolloutError::Session(_) => Stage::Session,
            RolloutError::LookupFailure { .. }
            | RolloutError::CreateConflict { .. }
            | RolloutError::CreateFailure { .. }
            | RolloutError::UpdateFailure { .. } => Stage::Reconcile,
            RolloutError::SelectorInvalid(_) | RolloutError::ListFailure { .. } => {
                Stage::Readiness
            }
            RolloutError::Cancelled { stage } => *stage,
        }
    }

    /// True when the workload was applied but never became ready, so a retry
    /// may skip reconciliation.
    pub fn is_partial(&self) -> bool {
        self.stage() == Stage::Readiness
    }
}

pub type Result<T> = std::result::Result<T, RolloutError>;
