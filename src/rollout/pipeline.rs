// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{ReadinessMonitor, ReadinessReport, Reconciled, Reconciler};
use crate::error::Result;
use crate::kubernetes::ControlPlaneClient;
use crate::types::WorkloadDescriptor;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct RolloutReport {
    pub reconciled: Reconciled,
    pub readiness: ReadinessReport,
}

/// Reconcile `descriptor`, then wait for the pods selected by the returned labels.
#[instrument(skip_all, fields(namespace = %namespace, name = %descriptor.name()))]
pub async fn run_rollout<C: ControlPlaneClient + ?Sized>(
    client: &C,
    namespace: &str,
    descriptor: &WorkloadDescriptor,
    poll_interval: Duration,
    cancel: &CancellationToken,
) -> Result<RolloutReport> {
    let reconciled = Reconciler::new(client, namespace)
        .reconcile(cancel, descriptor)
        .await?;
    info!(
        "Deployment {:?}, waiting for pods with labels {:?}",
        reconciled.action, reconciled.labels
    );

    let readiness = ReadinessMonitor::new(client, namespace)
        .with_interval(poll_interval)
        .wait_until_ready(cancel, &reconciled.labels)
        .await?;

    Ok(RolloutReport {
        reconciled,
        readiness,
    })
}
