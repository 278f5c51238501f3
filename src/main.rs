// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use rollout::config::Config;
use rollout::error::RolloutError;
use rollout::kubernetes::{connect, KubeControlPlane};
use rollout::manifest::{FileManifestLoader, ManifestLoader};
use rollout::rollout::run_rollout;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()
        .map_err(|e| RolloutError::Config(format!("{:#}", e)))
        .inspect_err(report_failure)?;
    info!(
        "Configuration loaded: manifest={}, namespace={}",
        config.manifest_path.display(),
        config.namespace
    );

    let descriptor = FileManifestLoader
        .load(&config.manifest_path)
        .map_err(RolloutError::from)
        .inspect_err(report_failure)?;
    info!(
        "Loaded deployment {} selecting pods by {:?}",
        descriptor.name(),
        descriptor.selector_labels()
    );

    let client = connect(&config)
        .await
        .map_err(|e| RolloutError::Session(format!("{:#}", e)))
        .inspect_err(report_failure)?;
    info!("Connected to Kubernetes cluster");
    let control_plane = KubeControlPlane::new(client);

    let cancel = CancellationToken::new();
    spawn_cancel_on_ctrl_c(cancel.clone());
    if let Some(timeout) = config.timeout {
        let deadline = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            warn!("Rollout deadline of {:?} expired", timeout);
            deadline.cancel();
        });
    }

    let report = run_rollout(
        &control_plane,
        &config.namespace,
        &descriptor,
        config.poll_interval,
        &cancel,
    )
    .await
    .inspect_err(report_failure)?;

    info!(
        "Rollout of {} finished: deployment {:?} with labels {:?}, pods running {}",
        descriptor.name(),
        report.reconciled.action,
        report.reconciled.labels,
        report.readiness.progress
    );
    Ok(())
}

fn spawn_cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling rollout");
            cancel.cancel();
        }
    });
}

fn report_failure(err: &RolloutError) {
    error!("Rollout failed in {} stage: {}", err.stage(), err);
    if err.is_partial() {
        warn!("The deployment was applied but its pods did not become ready");
    }
}
