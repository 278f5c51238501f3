// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{env as keys, readiness, DEFAULT_MANIFEST, DEFAULT_NAMESPACE};
use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Rollout configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub manifest_path: PathBuf,
    /// Namespace the deployment is applied to and pods are listed in
    pub namespace: String,
    pub poll_interval: Duration,
    /// Deadline for the whole rollout; `None` waits until interrupted
    pub timeout: Option<Duration>,
    /// Explicit kubeconfig file, otherwise the client config is inferred
    pub kubeconfig: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let manifest_path = lookup(keys::MANIFEST)
            .unwrap_or_else(|| DEFAULT_MANIFEST.to_string())
            .into();
        let namespace = lookup(keys::NAMESPACE).unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        let poll_interval_ms: u64 = match lookup(keys::POLL_INTERVAL_MS) {
            Some(v) => v.parse().with_context(|| {
                format!("{} must be an integer, got '{}'", keys::POLL_INTERVAL_MS, v)
            })?,
            None => readiness::POLL_INTERVAL_MS,
        };
        if poll_interval_ms == 0 {
            bail!("{} must be greater than zero", keys::POLL_INTERVAL_MS);
        }

        let timeout = lookup(keys::TIMEOUT_SECS)
            .map(|v| {
                v.parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| {
                        format!("{} must be an integer, got '{}'", keys::TIMEOUT_SECS, v)
                    })
            })
            .transpose()?;

        Ok(Config {
            manifest_path,
            namespace,
            poll_interval: Duration::from_millis(poll_interval_ms),
            timeout,
            kubeconfig: lookup(keys::KUBECONFIG).map(PathBuf::from),
        })
    }
}
