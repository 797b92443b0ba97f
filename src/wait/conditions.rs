// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Ready-made conditions for the built-in workload types.

use super::condition::ResourceCondition;
use crate::predicates;
use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet};
use k8s_openapi::api::batch::v1::{CronJob, Job};
use k8s_openapi::api::core::v1::Pod;

pub fn pod_is_ready(pod: &mut Pod) -> ResourceCondition<'_, Pod> {
    ResourceCondition::new(pod, "ready", predicates::is_pod_ready)
}

pub fn deployment_is_scheduled(deployment: &mut Deployment) -> ResourceCondition<'_, Deployment> {
    ResourceCondition::new(deployment, "scheduled", predicates::is_deployment_scheduled)
}

pub fn deployment_is_ready(deployment: &mut Deployment) -> ResourceCondition<'_, Deployment> {
    ResourceCondition::new(deployment, "ready", predicates::is_deployment_ready)
}

pub fn deployment_is_updated(deployment: &mut Deployment) -> ResourceCondition<'_, Deployment> {
    ResourceCondition::new(deployment, "updated", predicates::is_deployment_updated)
}

pub fn replica_set_is_available(rs: &mut ReplicaSet) -> ResourceCondition<'_, ReplicaSet> {
    ResourceCondition::new(rs, "available", predicates::is_replica_set_available)
}

pub fn replica_set_is_ready(rs: &mut ReplicaSet) -> ResourceCondition<'_, ReplicaSet> {
    ResourceCondition::new(rs, "ready", predicates::is_replica_set_ready)
}

pub fn job_is_active(job: &mut Job) -> ResourceCondition<'_, Job> {
    ResourceCondition::new(job, "active", predicates::is_job_active)
}

pub fn cron_job_is_active(cron_job: &mut CronJob) -> ResourceCondition<'_, CronJob> {
    ResourceCondition::new(cron_job, "active", predicates::is_cron_job_active)
}
