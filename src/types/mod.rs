// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Desired and observed state as seen by the rollout.

pub mod selector;
pub mod workload;

pub use selector::LabelSelector;
pub use workload::{ExecutionUnit, Labels, ResourceHandle, UnitPhase, WorkloadDescriptor};
