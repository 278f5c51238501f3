// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Readiness monitor - polls pods matching a label set until all of them run.

use super::until_cancelled;
use crate::constants::readiness::POLL_INTERVAL_MS;
use crate::error::{Result, RolloutError, Stage};
use crate::kubernetes::ControlPlaneClient;
use crate::types::{ExecutionUnit, LabelSelector, Labels};
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Running pods out of all pods observed in one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub running: usize,
    pub total: usize,
}

impl Progress {
    pub fn of(units: &[ExecutionUnit]) -> Self {
        Self {
            running: units.iter().filter(|u| u.phase.is_running()).count(),
            total: units.len(),
        }
    }

    /// An empty sample is never ready.
    pub fn is_ready(&self) -> bool {
        self.total > 0 && self.running == self.total
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.running, self.total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessReport {
    pub progress: Progress,
    /// Number of samples taken, including the ready one
    pub samples: usize,
}

pub struct ReadinessMonitor<'a, C: ?Sized> {
    client: &'a C,
    namespace: &'a str,
    interval: Duration,
}

impl<'a, C: ControlPlaneClient + ?Sized> ReadinessMonitor<'a, C> {
    pub fn new(client: &'a C, namespace: &'a str) -> Self {
        Self {
            client,
            namespace,
            interval: Duration::from_millis(POLL_INTERVAL_MS),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Block until every pod matching `labels` is running, and at least one exists.
    #[instrument(skip(self, cancel), fields(namespace = %self.namespace))]
    pub async fn wait_until_ready(
        &self,
        cancel: &CancellationToken,
        labels: &Labels,
    ) -> Result<ReadinessReport> {
        let selector = LabelSelector::from_labels(labels)?;
        let mut samples = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(RolloutError::Cancelled {
                    stage: Stage::Readiness,
                });
            }

            let units = until_cancelled(cancel, Stage::Readiness, async {
                self.client
                    .list_units(self.namespace, &selector)
                    .await
                    .map_err(|source| RolloutError::ListFailure {
                        selector: selector.to_string(),
                        source,
                    })
            })
            .await?;
            samples += 1;

            let progress = Progress::of(&units);
            for unit in &units {
                debug!("Pod {} is {}", unit.name, unit.phase);
            }

            if progress.is_ready() {
                info!("Pods running {}", progress);
                return Ok(ReadinessReport { progress, samples });
            }
            info!("Waiting for pods to start, running {}", progress);

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(RolloutError::Cancelled {
                        stage: Stage::Readiness,
                    });
                }
                _ = sleep(self.interval) => {}
            }
        }
    }
}
