// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses and the control plane.

use crate::error::ClientError;
use crate::kubernetes::ControlPlaneClient;
use crate::types::{ExecutionUnit, LabelSelector, Labels, ResourceHandle, UnitPhase};
use async_trait::async_trait;
use http::{Request, Response};
use k8s_openapi::api::apps::v1::Deployment;
use kube::client::Body;
use kube::{Client, ResourceExt};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tower::Service;

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<(String, String, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    /// Add a response for PUT requests matching the exact path
    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, status, body)
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    /// Method and path of every request received so far
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(m, p, _)| (m.clone(), p.clone()))
            .collect()
    }

    /// Query strings of every request received so far
    pub fn queries(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, _, q)| q.clone())
            .collect()
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        self.responses
            .lock()
            .unwrap()
            .get(&(method.to_string(), path.to_string()))
            .cloned()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let query = req.uri().query().unwrap_or_default().to_string();

        let response = self.find_response(&method, &path);
        self.requests.lock().unwrap().push((method, path, query));

        Box::pin(async move {
            let (status, body) =
                response.unwrap_or_else(|| (404, not_found_json("resource", "unknown")));
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

fn labels_json(labels: &[(&str, &str)]) -> serde_json::Value {
    labels
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
        .collect::<serde_json::Map<_, _>>()
        .into()
}

/// Create a mock Deployment JSON response
pub fn deployment_json(
    name: &str,
    template_labels: &[(&str, &str)],
    resource_version: &str,
) -> String {
    serde_json::json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": {
            "name": name,
            "namespace": "default",
            "resourceVersion": resource_version,
            "generation": 1
        },
        "spec": {
            "selector": { "matchLabels": labels_json(&template_labels[..1]) },
            "template": {
                "metadata": { "labels": labels_json(template_labels) },
                "spec": { "containers": [{ "name": name, "image": "nginx:1.27" }] }
            }
        }
    })
    .to_string()
}

/// Create a mock PodList JSON response
pub fn pod_list_json(pods: &[(&str, &str)], labels: &[(&str, &str)]) -> String {
    let items: Vec<serde_json::Value> = pods
        .iter()
        .map(|(name, phase)| {
            serde_json::json!({
                "apiVersion": "v1",
                "kind": "Pod",
                "metadata": { "name": name, "namespace": "default", "labels": labels_json(labels) },
                "status": { "phase": phase }
            })
        })
        .collect();

    serde_json::json!({
        "apiVersion": "v1",
        "kind": "PodList",
        "metadata": { "resourceVersion": "1" },
        "items": items
    })
    .to_string()
}

/// Create a failure Status response
pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", &format!("{} \"{}\" not found", resource, name))
}

/// A non-404 API failure, as returned for missing RBAC permissions
pub fn forbidden() -> ClientError {
    ClientError::from(kube::Error::Api(kube::core::ErrorResponse {
        status: "Failure".to_string(),
        message: "deployments.apps is forbidden".to_string(),
        reason: "Forbidden".to_string(),
        code: 403,
    }))
}

/// Build an execution unit for tests
pub fn unit(name: &str, phase: UnitPhase) -> ExecutionUnit {
    ExecutionUnit {
        name: name.to_string(),
        phase,
        labels: Labels::from([("app".to_string(), "api".to_string())]),
    }
}

/// Calls made against a [`FakeControlPlane`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get(String),
    Create(String),
    Update { name: String, resource_version: Option<String> },
    List(String),
}

/// In-memory control plane holding at most one deployment.
///
/// Errors queued with the `fail_*` methods are returned once, in place of the
/// normal behaviour. Unit samples are served in order and the last one repeats.
#[derive(Default)]
pub struct FakeControlPlane {
    stored: Mutex<Option<ResourceHandle>>,
    injected_labels: Labels,
    calls: Mutex<Vec<Call>>,
    get_error: Mutex<Option<ClientError>>,
    create_error: Mutex<Option<ClientError>>,
    update_error: Mutex<Option<ClientError>>,
    samples: Mutex<VecDeque<Result<Vec<ExecutionUnit>, ClientError>>>,
    last_sample: Mutex<Vec<ExecutionUnit>>,
    list_delay: Option<Duration>,
}

impl FakeControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels the server adds to the pod template on every write
    pub fn with_injected_labels(mut self, labels: &[(&str, &str)]) -> Self {
        self.injected_labels = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self
    }

    pub fn with_existing(self, name: &str, resource_version: &str) -> Self {
        *self.stored.lock().unwrap() = Some(ResourceHandle {
            name: name.to_string(),
            generation: Some(1),
            resource_version: Some(resource_version.to_string()),
            template_labels: Labels::new(),
        });
        self
    }

    pub fn with_samples(self, samples: Vec<Vec<ExecutionUnit>>) -> Self {
        self.samples
            .lock()
            .unwrap()
            .extend(samples.into_iter().map(Ok));
        self
    }

    pub fn with_list_error(self, err: ClientError) -> Self {
        self.samples.lock().unwrap().push_back(Err(err));
        self
    }

    /// Delay every list call, to cancel while a request is in flight
    pub fn with_list_delay(mut self, delay: Duration) -> Self {
        self.list_delay = Some(delay);
        self
    }

    pub fn fail_get(self, err: ClientError) -> Self {
        *self.get_error.lock().unwrap() = Some(err);
        self
    }

    pub fn fail_create(self, err: ClientError) -> Self {
        *self.create_error.lock().unwrap() = Some(err);
        self
    }

    pub fn fail_update(self, err: ClientError) -> Self {
        *self.update_error.lock().unwrap() = Some(err);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matcher: fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matcher(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn store(&self, resource: &Deployment) -> ResourceHandle {
        let mut stored = self.stored.lock().unwrap();
        let generation = stored.as_ref().and_then(|h| h.generation).unwrap_or(0) + 1;
        let mut handle = ResourceHandle::from(resource);
        handle.template_labels.extend(self.injected_labels.clone());
        handle.generation = Some(generation);
        handle.resource_version = Some(generation.to_string());
        *stored = Some(handle.clone());
        handle
    }
}

#[async_trait]
impl ControlPlaneClient for FakeControlPlane {
    async fn get_resource(
        &self,
        _namespace: &str,
        name: &str,
    ) -> Result<ResourceHandle, ClientError> {
        self.record(Call::Get(name.to_string()));
        if let Some(err) = self.get_error.lock().unwrap().take() {
            return Err(err);
        }
        self.stored
            .lock()
            .unwrap()
            .clone()
            .filter(|h| h.name == name)
            .ok_or_else(|| ClientError::NotFound(name.to_string()))
    }

    async fn create_resource(
        &self,
        _namespace: &str,
        resource: &Deployment,
    ) -> Result<ResourceHandle, ClientError> {
        self.record(Call::Create(resource.name_any()));
        if let Some(err) = self.create_error.lock().unwrap().take() {
            return Err(err);
        }
        if self.stored.lock().unwrap().is_some() {
            return Err(ClientError::AlreadyExists(resource.name_any()));
        }
        Ok(self.store(resource))
    }

    async fn update_resource(
        &self,
        _namespace: &str,
        resource: &Deployment,
    ) -> Result<ResourceHandle, ClientError> {
        self.record(Call::Update {
            name: resource.name_any(),
            resource_version: resource.resource_version(),
        });
        if let Some(err) = self.update_error.lock().unwrap().take() {
            return Err(err);
        }
        if self.stored.lock().unwrap().is_none() {
            return Err(ClientError::NotFound(resource.name_any()));
        }
        Ok(self.store(resource))
    }

    async fn list_units(
        &self,
        _namespace: &str,
        selector: &LabelSelector,
    ) -> Result<Vec<ExecutionUnit>, ClientError> {
        self.record(Call::List(selector.to_string()));
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.samples.lock().unwrap().pop_front();
        match next {
            Some(Ok(units)) => {
                *self.last_sample.lock().unwrap() = units.clone();
                Ok(units)
            }
            Some(Err(err)) => Err(err),
            None => Ok(self.last_sample.lock().unwrap().clone()),
        }
    }
}
