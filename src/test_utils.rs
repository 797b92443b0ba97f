// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<AtomicUsize>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Number of requests received so far, answered or not
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
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
        self.requests.fetch_add(1, Ordering::SeqCst);
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let (status, body) = self
            .find_response(&method, &path)
            .unwrap_or_else(|| (404, not_found_json("path", &path)));

        Box::pin(async move {
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a mock namespace JSON response
pub fn namespace_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid"
        }
    })
    .to_string()
}

/// Create a mock job JSON response with the given number of active pods
pub fn job_json(name: &str, uid: &str, active: i32) -> String {
    serde_json::json!({
        "apiVersion": "batch/v1",
        "kind": "Job",
        "metadata": {
            "name": name,
            "namespace": "default",
            "uid": uid
        },
        "spec": {
            "template": { "spec": { "containers": [] } }
        },
        "status": { "active": active }
    })
    .to_string()
}

fn pod_value(name: &str, owner_uid: Option<&str>) -> serde_json::Value {
    let owner_references: Vec<serde_json::Value> = owner_uid
        .map(|uid| {
            serde_json::json!({
                "apiVersion": "batch/v1",
                "kind": "Job",
                "name": "owner",
                "uid": uid
            })
        })
        .into_iter()
        .collect();

    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {
            "name": name,
            "namespace": "default",
            "ownerReferences": owner_references
        }
    })
}

/// Create a mock pod list; each entry is a pod name and its optional owner UID
pub fn pod_list_json(pods: &[(&str, Option<&str>)]) -> String {
    let items: Vec<serde_json::Value> = pods
        .iter()
        .map(|(name, owner)| pod_value(name, *owner))
        .collect();

    serde_json::json!({
        "apiVersion": "v1",
        "kind": "PodList",
        "metadata": { "resourceVersion": "1" },
        "items": items
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Create a generic success status response
pub fn status_success_json() -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Success",
        "code": 200
    })
    .to_string()
}
