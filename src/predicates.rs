// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Point-in-time readiness checks over object status. No I/O.

use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet};
use k8s_openapi::api::batch::v1::{CronJob, Job};
use k8s_openapi::api::core::v1::Pod;

/// A pod is ready once it reports container statuses and all of them are ready
pub fn is_pod_ready(pod: &Pod) -> bool {
    pod.status
        .as_ref()
        .and_then(|s| s.container_statuses.as_ref())
        .is_some_and(|statuses| !statuses.is_empty() && statuses.iter().all(|c| c.ready))
}

fn desired_deployment_replicas(deployment: &Deployment) -> i32 {
    deployment
        .spec
        .as_ref()
        .and_then(|s| s.replicas)
        .unwrap_or(1)
}

/// Enough replicas exist, ready or not
pub fn is_deployment_scheduled(deployment: &Deployment) -> bool {
    let current = deployment
        .status
        .as_ref()
        .and_then(|s| s.replicas)
        .unwrap_or(0);
    current >= desired_deployment_replicas(deployment)
}

pub fn is_deployment_ready(deployment: &Deployment) -> bool {
    let ready = deployment
        .status
        .as_ref()
        .and_then(|s| s.ready_replicas)
        .unwrap_or(0);
    ready == desired_deployment_replicas(deployment)
}

pub fn is_deployment_updated(deployment: &Deployment) -> bool {
    let updated = deployment
        .status
        .as_ref()
        .and_then(|s| s.updated_replicas)
        .unwrap_or(0);
    updated == desired_deployment_replicas(deployment)
}

fn desired_replica_set_replicas(rs: &ReplicaSet) -> i32 {
    rs.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1)
}

pub fn is_replica_set_available(rs: &ReplicaSet) -> bool {
    let available = rs
        .status
        .as_ref()
        .and_then(|s| s.available_replicas)
        .unwrap_or(0);
    available == desired_replica_set_replicas(rs)
}

pub fn is_replica_set_ready(rs: &ReplicaSet) -> bool {
    let ready = rs
        .status
        .as_ref()
        .and_then(|s| s.ready_replicas)
        .unwrap_or(0);
    ready == desired_replica_set_replicas(rs)
}

/// At least one pod of the job is running
pub fn is_job_active(job: &Job) -> bool {
    job.status
        .as_ref()
        .and_then(|s| s.active)
        .is_some_and(|active| active > 0)
}

/// The cron job currently references at least one running job
pub fn is_cron_job_active(cron_job: &CronJob) -> bool {
    cron_job
        .status
        .as_ref()
        .and_then(|s| s.active.as_ref())
        .is_some_and(|active| !active.is_empty())
}
