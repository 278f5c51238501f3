// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Control plane capabilities used by the rollout, and their kube-backed implementation.

use crate::error::ClientError;
use crate::types::{ExecutionUnit, LabelSelector, ResourceHandle};
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Pod;
use kube::{
    api::{ListParams, PostParams},
    Api, Client, ResourceExt,
};
use tracing::{debug, instrument};

/// The calls the reconciler and readiness monitor make against the cluster.
#[async_trait]
pub trait ControlPlaneClient: Send + Sync {
    async fn get_resource(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ResourceHandle, ClientError>;

    async fn create_resource(
        &self,
        namespace: &str,
        resource: &Deployment,
    ) -> Result<ResourceHandle, ClientError>;

    /// Replace the stored object with `resource`
    async fn update_resource(
        &self,
        namespace: &str,
        resource: &Deployment,
    ) -> Result<ResourceHandle, ClientError>;

    async fn list_units(
        &self,
        namespace: &str,
        selector: &LabelSelector,
    ) -> Result<Vec<ExecutionUnit>, ClientError>;
}

/// [`ControlPlaneClient`] talking to a Kubernetes API server.
#[derive(Clone)]
pub struct KubeControlPlane {
    client: Client,
}

impl KubeControlPlane {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn deployments(&self, namespace: &str) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl ControlPlaneClient for KubeControlPlane {
    #[instrument(skip(self))]
    async fn get_resource(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ResourceHandle, ClientError> {
        let deployment = self.deployments(namespace).get(name).await?;
        Ok(ResourceHandle::from(&deployment))
    }

    #[instrument(skip(self, resource), fields(name = %resource.name_any()))]
    async fn create_resource(
        &self,
        namespace: &str,
        resource: &Deployment,
    ) -> Result<ResourceHandle, ClientError> {
        let created = self
            .deployments(namespace)
            .create(&PostParams::default(), resource)
            .await?;
        debug!("Created deployment at generation {:?}", created.metadata.generation);
        Ok(ResourceHandle::from(&created))
    }

    #[instrument(skip(self, resource), fields(name = %resource.name_any()))]
    async fn update_resource(
        &self,
        namespace: &str,
        resource: &Deployment,
    ) -> Result<ResourceHandle, ClientError> {
        let updated = self
            .deployments(namespace)
            .replace(&resource.name_any(), &PostParams::default(), resource)
            .await?;
        debug!("Replaced deployment, now at generation {:?}", updated.metadata.generation);
        Ok(ResourceHandle::from(&updated))
    }

    #[instrument(skip(self), fields(selector = %selector))]
    async fn list_units(
        &self,
        namespace: &str,
        selector: &LabelSelector,
    ) -> Result<Vec<ExecutionUnit>, ClientError> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let lp = ListParams::default().labels(&selector.to_string());
        let pod_list = pods.list(&lp).await?;

        Ok(pod_list.items.iter().map(ExecutionUnit::from).collect())
    }
}
