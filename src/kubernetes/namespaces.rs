// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace management for test isolation

use crate::error::{Result, TestutilError};
use crate::kubernetes::KubeClient;
use k8s_openapi::api::core::v1::Namespace;
use kube::{
    api::{DeleteParams, ObjectMeta, PostParams},
    Api,
};
use tracing::{debug, info, instrument};

impl KubeClient {
    /// Ensure a namespace exists in the cluster, create if it doesn't
    #[instrument(skip(self))]
    pub async fn ensure_namespace(&self, namespace: &str) -> Result<()> {
        let namespaces: Api<Namespace> = Api::all(self.inner().clone());

        match namespaces.get(namespace).await {
            Ok(_) => {
                debug!("Namespace {} already exists", namespace);
                Ok(())
            }
            Err(kube::Error::Api(err)) if err.code == 404 => {
                info!("Creating namespace {}", namespace);
                let ns = Namespace {
                    metadata: ObjectMeta {
                        name: Some(namespace.to_string()),
                        ..Default::default()
                    },
                    ..Default::default()
                };
                namespaces
                    .create(&PostParams::default(), &ns)
                    .await
                    .map_err(|e| {
                        TestutilError::NamespaceError(format!(
                            "Failed to create namespace {}: {}",
                            namespace, e
                        ))
                    })?;
                info!("Namespace {} created successfully", namespace);
                Ok(())
            }
            Err(e) => Err(TestutilError::NamespaceError(format!(
                "Failed to check namespace {}: {}",
                namespace, e
            ))),
        }
    }

    /// Delete a namespace; a namespace that is already gone is not an error
    #[instrument(skip(self))]
    pub async fn delete_namespace(&self, namespace: &str) -> Result<()> {
        let namespaces: Api<Namespace> = Api::all(self.inner().clone());

        match namespaces.delete(namespace, &DeleteParams::background()).await {
            Ok(_) => {
                info!("Namespace {} deletion requested", namespace);
                Ok(())
            }
            Err(kube::Error::Api(err)) if err.code == 404 => {
                debug!("Namespace {} does not exist", namespace);
                Ok(())
            }
            Err(e) => Err(TestutilError::NamespaceError(format!(
                "Failed to delete namespace {}: {}",
                namespace, e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{namespace_json, not_found_json, status_success_json, MockService};

    const NS_PATH: &str = "/api/v1/namespaces/e2e";

    #[tokio::test]
    async fn test_ensure_namespace_existing() {
        let mock = MockService::new().on_get(NS_PATH, 200, &namespace_json("e2e"));
        let client = KubeClient::new(mock.clone().into_client());

        client.ensure_namespace("e2e").await.unwrap();

        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_ensure_namespace_creates_missing() {
        let mock = MockService::new()
            .on_get(NS_PATH, 404, &not_found_json("namespaces", "e2e"))
            .on_post("/api/v1/namespaces", 201, &namespace_json("e2e"));
        let client = KubeClient::new(mock.clone().into_client());

        client.ensure_namespace("e2e").await.unwrap();

        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test]
    async fn test_ensure_namespace_reports_create_failure() {
        let forbidden = serde_json::json!({
            "kind": "Status",
            "apiVersion": "v1",
            "status": "Failure",
            "message": "namespaces is forbidden",
            "reason": "Forbidden",
            "code": 403
        });
        let client = KubeClient::new(
            MockService::new()
                .on_get(NS_PATH, 404, &not_found_json("namespaces", "e2e"))
                .on_post("/api/v1/namespaces", 403, &forbidden.to_string())
                .into_client(),
        );

        let err = client.ensure_namespace("e2e").await.unwrap_err();

        assert!(matches!(err, TestutilError::NamespaceError(_)));
    }

    #[tokio::test]
    async fn test_delete_namespace() {
        let mock = MockService::new().on_delete(NS_PATH, 200, &namespace_json("e2e"));
        let client = KubeClient::new(mock.clone().into_client());

        client.delete_namespace("e2e").await.unwrap();

        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_delete_namespace_answered_with_status() {
        let mock = MockService::new().on_delete(NS_PATH, 200, &status_success_json());
        let client = KubeClient::new(mock.clone().into_client());

        client.delete_namespace("e2e").await.unwrap();

        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_namespace_is_ok() {
        let client = KubeClient::new(MockService::new().into_client());

        client.delete_namespace("e2e").await.unwrap();
    }
}
