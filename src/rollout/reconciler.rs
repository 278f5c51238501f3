// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deployment reconciler - creates the deployment if absent, replaces it otherwise.

use super::until_cancelled;
use crate::error::{ClientError, Result, RolloutError, Stage};
use crate::kubernetes::ControlPlaneClient;
use crate::types::{Labels, ResourceHandle, WorkloadDescriptor};
use k8s_openapi::api::apps::v1::Deployment;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    Created,
    Updated,
}

/// Result of a successful reconcile.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub action: ReconcileAction,
    /// Pod template labels as stored by the API server
    pub labels: Labels,
    pub handle: ResourceHandle,
}

pub struct Reconciler<'a, C: ?Sized> {
    client: &'a C,
    namespace: &'a str,
}

impl<'a, C: ControlPlaneClient + ?Sized> Reconciler<'a, C> {
    pub fn new(client: &'a C, namespace: &'a str) -> Self {
        Self { client, namespace }
    }

    /// Apply `descriptor` with exactly one create or update call.
    #[instrument(
        skip(self, cancel, descriptor),
        fields(namespace = %self.namespace, name = %descriptor.name())
    )]
    pub async fn reconcile(
        &self,
        cancel: &CancellationToken,
        descriptor: &WorkloadDescriptor,
    ) -> Result<Reconciled> {
        let name = descriptor.name();
        if cancel.is_cancelled() {
            return Err(RolloutError::Cancelled {
                stage: Stage::Reconcile,
            });
        }

        let existing = until_cancelled(cancel, Stage::Reconcile, async {
            match self.client.get_resource(self.namespace, name).await {
                Ok(handle) => Ok(Some(handle)),
                Err(ClientError::NotFound(_)) => Ok(None),
                Err(source) => Err(RolloutError::LookupFailure {
                    name: name.to_string(),
                    source,
                }),
            }
        })
        .await?;

        let mut payload = self.payload(descriptor);

        let reconciled = match existing {
            None => {
                debug!("Deployment {} not found, creating", name);
                let handle = until_cancelled(cancel, Stage::Reconcile, async {
                    self.client
                        .create_resource(self.namespace, &payload)
                        .await
                        .map_err(|source| match source {
                            ClientError::AlreadyExists(_) => RolloutError::CreateConflict {
                                name: name.to_string(),
                                source,
                            },
                            source => RolloutError::CreateFailure {
                                name: name.to_string(),
                                source,
                            },
                        })
                })
                .await?;
                info!("Created deployment {}/{}", self.namespace, name);
                Reconciled {
                    action: ReconcileAction::Created,
                    labels: handle.template_labels.clone(),
                    handle,
                }
            }
            Some(current) => {
                debug!(
                    "Deployment {} exists at resource version {:?}, replacing",
                    name, current.resource_version
                );
                // Pin the observed version so a concurrent write is rejected, not overwritten
                payload.metadata.resource_version = current.resource_version;
                let handle = until_cancelled(cancel, Stage::Reconcile, async {
                    self.client
                        .update_resource(self.namespace, &payload)
                        .await
                        .map_err(|source| RolloutError::UpdateFailure {
                            name: name.to_string(),
                            source,
                        })
                })
                .await?;
                info!("Updated deployment {}/{}", self.namespace, name);
                Reconciled {
                    action: ReconcileAction::Updated,
                    labels: handle.template_labels.clone(),
                    handle,
                }
            }
        };

        Ok(reconciled)
    }

    fn payload(&self, descriptor: &WorkloadDescriptor) -> Deployment {
        let mut payload = descriptor.payload().clone();
        payload.metadata.namespace = Some(self.namespace.to_string());
        payload.metadata.resource_version = None;
        payload.status = None;
        payload
    }
}
