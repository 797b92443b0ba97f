// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! API-server backed client used by tests

use crate::error::{Result, TestutilError};
use crate::events::filter_events;
use crate::kubernetes::portforward::PortForward;
use crate::owner::list_owned;
use crate::provider::{ListProvider, NamespacedObject, StateProvider};
use crate::types::ObjectKey;
use crate::wait::{Backoff, Condition, WaitContext, Waiter};
use async_trait::async_trait;
use futures::AsyncBufRead;
use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet};
use k8s_openapi::api::batch::v1::{CronJob, Job};
use k8s_openapi::api::core::v1::{Event, Pod};
use kube::api::{ListParams, LogParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Resource, ResourceExt};
use tracing::{debug, info, instrument};

/// A `kube::Client` plus the polling policy used by its waits
#[derive(Clone)]
pub struct KubeClient {
    client: Client,
    backoff: Backoff,
}

impl KubeClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            backoff: Backoff::default(),
        }
    }

    /// Connect using the ambient configuration (KUBECONFIG or in-cluster)
    pub async fn try_default() -> Result<Self> {
        let client = Client::try_default().await?;
        Ok(Self::new(client))
    }

    /// Create a client from a kubeconfig document
    pub async fn from_kubeconfig(kubeconfig: &str) -> Result<Self> {
        let kubeconfig_parsed: Kubeconfig = serde_yaml::from_str(kubeconfig).map_err(|e| {
            TestutilError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e))
        })?;

        let client_config =
            kube::Config::from_custom_kubeconfig(kubeconfig_parsed, &KubeConfigOptions::default())
                .await
                .map_err(|e| {
                    TestutilError::KubeconfigError(format!("Failed to create config: {}", e))
                })?;

        let client = Client::try_from(client_config).map_err(|e| {
            TestutilError::KubeconfigError(format!("Failed to create client: {}", e))
        })?;
        Ok(Self::new(client))
    }

    /// Use a different polling policy for `wait_until`
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Wait until all conditions hold, refreshing their objects from the API server
    pub async fn wait_until(
        &self,
        ctx: &WaitContext,
        conditions: &mut [&mut dyn Condition<Self>],
    ) -> Result<()> {
        Waiter::new(self)
            .backoff(self.backoff)
            .wait_until(ctx, conditions)
            .await
    }

    pub async fn pods_for_owner<O: Resource>(&self, owner: &O) -> Result<Vec<Pod>> {
        list_owned(self, owner).await
    }

    pub async fn pods_for_job(&self, job: &Job) -> Result<Vec<Pod>> {
        self.pods_for_owner(job).await
    }

    pub async fn replica_sets_for_owner<O: Resource>(&self, owner: &O) -> Result<Vec<ReplicaSet>> {
        list_owned(self, owner).await
    }

    pub async fn replica_sets_for_deployment(
        &self,
        deployment: &Deployment,
    ) -> Result<Vec<ReplicaSet>> {
        self.replica_sets_for_owner(deployment).await
    }

    pub async fn jobs_for_owner<O: Resource>(&self, owner: &O) -> Result<Vec<Job>> {
        list_owned(self, owner).await
    }

    /// Jobs spawned by a cron job, found through owner references
    pub async fn jobs_for_cron_job(&self, cron_job: &CronJob) -> Result<Vec<Job>> {
        self.jobs_for_owner(cron_job).await
    }

    /// Events recorded for an object, oldest first as returned by the API server
    #[instrument(skip(self, obj), fields(object = %ObjectKey::from_resource(obj)))]
    pub async fn events_for<K>(&self, obj: &K) -> Result<Vec<Event>>
    where
        K: Resource<DynamicType = ()>,
    {
        let namespace = ObjectKey::from_resource(obj).namespace;
        let events: Vec<Event> = self.list(&namespace, None).await?;
        Ok(filter_events(events, obj))
    }

    /// Full log output of the pod's (only) container
    #[instrument(skip(self, pod), fields(pod = %ObjectKey::from_resource(pod)))]
    pub async fn pod_logs(&self, pod: &Pod) -> Result<String> {
        let key = ObjectKey::from_resource(pod);
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), &key.namespace);
        let logs = pods.logs(&key.name, &LogParams::default()).await?;
        debug!("Fetched {} bytes of logs", logs.len());
        Ok(logs)
    }

    /// Log output as a byte stream; with `follow` it stays open while the container runs
    #[instrument(skip(self, pod), fields(pod = %ObjectKey::from_resource(pod)))]
    pub async fn pod_log_stream(&self, pod: &Pod, follow: bool) -> Result<impl AsyncBufRead> {
        let key = ObjectKey::from_resource(pod);
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), &key.namespace);
        let params = LogParams {
            follow,
            ..LogParams::default()
        };
        Ok(pods.log_stream(&key.name, &params).await?)
    }

    /// Forward `local_port` (or a free port for `PORT_ANY`) to `pod_port` on the pod
    pub async fn port_forward(&self, pod: &Pod, local_port: u16, pod_port: u16) -> Result<PortForward> {
        let pf = PortForward::open(self.client.clone(), pod, local_port, pod_port).await?;
        info!(
            "Forwarding {} to {}:{}",
            pf.local_addr(),
            pod.name_any(),
            pod_port
        );
        Ok(pf)
    }
}

#[async_trait]
impl StateProvider for KubeClient {
    async fn fetch<K: NamespacedObject>(&self, key: &ObjectKey) -> std::result::Result<K, kube::Error> {
        let api: Api<K> = Api::namespaced(self.client.clone(), &key.namespace);
        api.get(&key.name).await
    }
}

#[async_trait]
impl ListProvider for KubeClient {
    async fn list<K: NamespacedObject>(
        &self,
        namespace: &str,
        label_selector: Option<&str>,
    ) -> std::result::Result<Vec<K>, kube::Error> {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        let mut params = ListParams::default();
        if let Some(selector) = label_selector {
            params = params.labels(selector);
        }
        Ok(api.list(&params).await?.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{job_json, not_found_json, pod_list_json, MockService};
    use crate::types::object_with_name;
    use crate::wait::conditions::job_is_active;
    use futures::{AsyncBufReadExt, TryStreamExt};
    use http::{Request, Response};
    use kube::client::Body;
    use std::time::Duration;

    const JOB_PATH: &str = "/apis/batch/v1/namespaces/default/jobs/migrate";

    fn make_job(uid: &str) -> Job {
        let mut job: Job = object_with_name("default", "migrate");
        job.metadata.uid = Some(uid.to_string());
        job
    }

    #[tokio::test]
    async fn test_fetch_reads_object_from_api() {
        let client = KubeClient::new(
            MockService::new()
                .on_get(JOB_PATH, 200, &job_json("migrate", "uid-1", 2))
                .into_client(),
        );

        let job: Job = client.fetch(&ObjectKey::new("default", "migrate")).await.unwrap();

        assert_eq!(job.metadata.uid.as_deref(), Some("uid-1"));
        assert_eq!(job.status.unwrap().active, Some(2));
    }

    #[tokio::test]
    async fn test_wait_until_surfaces_not_found() {
        let mock = MockService::new().on_get(JOB_PATH, 404, &not_found_json("jobs", "migrate"));
        let client = KubeClient::new(mock.clone().into_client());
        let mut job = make_job("uid-1");

        let err = client
            .wait_until(
                &WaitContext::with_timeout(Duration::from_secs(5)),
                &mut [&mut job_is_active(&mut job)],
            )
            .await
            .unwrap_err();

        assert!(err.is_not_found(), "unexpected error: {}", err);
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_wait_until_performs_exactly_one_request() {
        let (service, mut handle) = tower_test::mock::pair::<Request<Body>, Response<Body>>();
        let client = KubeClient::new(Client::new(service, "default"));

        let server = tokio::spawn(async move {
            let (request, send) = handle.next_request().await.expect("service not called");
            assert_eq!(request.method(), http::Method::GET);
            assert_eq!(request.uri().path(), JOB_PATH);
            send.send_response(
                Response::builder()
                    .status(200)
                    .body(Body::from(job_json("migrate", "uid-1", 1).into_bytes()))
                    .unwrap(),
            );
            // no further request may arrive
            assert!(handle.next_request().await.is_none());
        });

        let mut job = make_job("uid-1");
        client
            .wait_until(
                &WaitContext::with_timeout(Duration::from_secs(5)),
                &mut [&mut job_is_active(&mut job)],
            )
            .await
            .unwrap();
        drop(client);

        server.await.unwrap();
        assert_eq!(job.status.unwrap().active, Some(1));
    }

    #[tokio::test]
    async fn test_pods_for_job_filters_by_owner() {
        let client = KubeClient::new(
            MockService::new()
                .on_get(
                    "/api/v1/namespaces/default/pods",
                    200,
                    &pod_list_json(&[
                        ("migrate-abcde", Some("uid-1")),
                        ("web-0", Some("uid-7")),
                        ("standalone", None),
                    ]),
                )
                .into_client(),
        );

        let pods = client.pods_for_job(&make_job("uid-1")).await.unwrap();

        let names: Vec<String> = pods.iter().map(|p| p.name_any()).collect();
        assert_eq!(names, vec!["migrate-abcde"]);
    }

    #[tokio::test]
    async fn test_pods_for_owner_rejects_unsaved_owner() {
        let mock = MockService::new();
        let client = KubeClient::new(mock.clone().into_client());
        let job: Job = object_with_name("default", "migrate");

        let err = client.pods_for_job(&job).await.unwrap_err();

        assert!(matches!(err, TestutilError::InvalidOwner(_)));
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_events_for_pod() {
        let events = serde_json::json!({
            "apiVersion": "v1",
            "kind": "EventList",
            "metadata": {},
            "items": [
                {
                    "metadata": { "name": "web-0.1", "namespace": "default" },
                    "involvedObject": { "apiVersion": "v1", "kind": "Pod", "name": "web-0" },
                    "reason": "Scheduled"
                },
                {
                    "metadata": { "name": "web-1.1", "namespace": "default" },
                    "involvedObject": { "apiVersion": "v1", "kind": "Pod", "name": "web-1" },
                    "reason": "Scheduled"
                }
            ]
        });
        let client = KubeClient::new(
            MockService::new()
                .on_get("/api/v1/namespaces/default/events", 200, &events.to_string())
                .into_client(),
        );
        let pod: Pod = object_with_name("default", "web-0");

        let found = client.events_for(&pod).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].reason.as_deref(), Some("Scheduled"));
    }

    #[tokio::test]
    async fn test_pod_logs() {
        let client = KubeClient::new(
            MockService::new()
                .on_get(
                    "/api/v1/namespaces/default/pods/web-0/log",
                    200,
                    "listening on :8080\n",
                )
                .into_client(),
        );
        let pod: Pod = object_with_name("default", "web-0");

        let logs = client.pod_logs(&pod).await.unwrap();

        assert_eq!(logs, "listening on :8080\n");
    }

    #[tokio::test]
    async fn test_pod_log_stream_reads_lines() {
        let client = KubeClient::new(
            MockService::new()
                .on_get(
                    "/api/v1/namespaces/default/pods/web-0/log",
                    200,
                    "starting\nlistening on :8080\n",
                )
                .into_client(),
        );
        let pod: Pod = object_with_name("default", "web-0");

        let stream = client.pod_log_stream(&pod, true).await.unwrap();
        let lines: Vec<String> = stream.lines().try_collect().await.unwrap();

        assert_eq!(lines, vec!["starting", "listening on :8080"]);
    }

    #[tokio::test]
    async fn test_from_kubeconfig_rejects_garbage() {
        let result = KubeClient::from_kubeconfig("this: [is not a kubeconfig").await;
        assert!(matches!(result, Err(TestutilError::KubeconfigError(_))));
    }
}
