// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Environment variables read by [`Config`](crate::config::Config)
pub mod env {
    pub const MANIFEST: &str = "ROLLOUT_MANIFEST";
    pub const NAMESPACE: &str = "ROLLOUT_NAMESPACE";
    pub const POLL_INTERVAL_MS: &str = "ROLLOUT_POLL_INTERVAL_MS";
    pub const TIMEOUT_SECS: &str = "ROLLOUT_TIMEOUT_SECS";
    pub const KUBECONFIG: &str = "ROLLOUT_KUBECONFIG";
}

pub const DEFAULT_MANIFEST: &str = "deploy.yaml";
pub const DEFAULT_NAMESPACE: &str = "default";

/// Readiness polling configuration
pub mod readiness {
    /// Fixed delay between two pod samples, in milliseconds
    pub const POLL_INTERVAL_MS: u64 = 1000;
    /// Pod phase counted as ready
    pub const RUNNING_PHASE: &str = "Running";
}

/// Label syntax limits
pub mod labels {
    pub const MAX_NAME_LEN: usize = 63;
    pub const MAX_PREFIX_LEN: usize = 253;
}
