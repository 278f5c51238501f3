// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes session bootstrap and the control plane client.

pub mod client;
pub mod control_plane;

pub use client::connect;
pub use control_plane::{ControlPlaneClient, KubeControlPlane};
