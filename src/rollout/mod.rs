// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Reconcile a deployment, then wait for its pods to run.

pub mod monitor;
pub mod pipeline;
pub mod reconciler;

pub use monitor::{Progress, ReadinessMonitor, ReadinessReport};
pub use pipeline::{run_rollout, RolloutReport};
pub use reconciler::{ReconcileAction, Reconciled, Reconciler};

use crate::error::{Result, RolloutError, Stage};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Run `fut` unless `cancel` fires first, in which case `fut` is dropped.
async fn until_cancelled<F, T>(cancel: &CancellationToken, stage: Stage, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(RolloutError::Cancelled { stage }),
        res = fut => res,
    }
}
