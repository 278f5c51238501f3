// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Authenticated client creation from local credentials

use crate::config::Config;
use anyhow::{Context, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Client;
use std::path::Path;
use tracing::{info, instrument};

/// Create a Kubernetes client, from the configured kubeconfig file if any,
/// otherwise from the inferred environment (KUBECONFIG, ~/.kube/config, in-cluster).
#[instrument(skip(config))]
pub async fn connect(config: &Config) -> Result<Client> {
    match &config.kubeconfig {
        Some(path) => create_client_from_kubeconfig_file(path).await,
        None => {
            info!("Inferring Kubernetes client configuration");
            Client::try_default()
                .await
                .context("Failed to infer Kubernetes client configuration")
        }
    }
}

async fn create_client_from_kubeconfig_file(path: &Path) -> Result<Client> {
    info!("Loading kubeconfig from {}", path.display());

    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read kubeconfig {}", path.display()))?;
    create_client_from_kubeconfig(&contents).await
}

/// Create a Kubernetes client from a kubeconfig string
async fn create_client_from_kubeconfig(kubeconfig: &str) -> Result<Client> {
    let kubeconfig_parsed: Kubeconfig =
        serde_yaml::from_str(kubeconfig).context("Failed to parse kubeconfig")?;

    let client_config =
        kube::Config::from_custom_kubeconfig(kubeconfig_parsed, &KubeConfigOptions::default())
            .await
            .context("Failed to create client config from kubeconfig")?;

    Client::try_from(client_config).context("Failed to create client")
}
