// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Panicking shorthands for test bodies, where a failed lookup or wait should
//! fail the test with a readable message.

use crate::provider::{NamespacedObject, StateProvider};
use crate::types::ObjectKey;
use crate::wait::{Condition, WaitContext, Waiter};

/// Fetch an object or panic naming it
pub async fn must_get<K, P>(provider: &P, namespace: &str, name: &str) -> K
where
    K: NamespacedObject,
    P: StateProvider,
{
    let key = ObjectKey::new(namespace, name);
    match provider.fetch::<K>(&key).await {
        Ok(obj) => obj,
        Err(e) => panic!("failed to get {} {}: {}", K::kind(&()), key, e),
    }
}

/// Wait for all conditions with default polling, or panic with the reason
pub async fn must_wait_until<P: StateProvider>(
    provider: &P,
    ctx: &WaitContext,
    conditions: &mut [&mut dyn Condition<P>],
) {
    if let Err(e) = Waiter::new(provider).wait_until(ctx, conditions).await {
        panic!("wait failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::FakeProvider;
    use crate::types::object_with_name;
    use crate::wait::conditions::job_is_active;
    use k8s_openapi::api::batch::v1::{Job, JobStatus};
    use std::time::Duration;

    fn make_active_job() -> Job {
        let mut job: Job = object_with_name("default", "migrate");
        job.status = Some(JobStatus {
            active: Some(1),
            ..Default::default()
        });
        job
    }

    #[tokio::test]
    async fn test_must_get_returns_object() {
        let fake = FakeProvider::new();
        fake.insert(&make_active_job());

        let job: Job = must_get(&fake, "default", "migrate").await;

        assert_eq!(job.status.unwrap().active, Some(1));
    }

    #[tokio::test]
    #[should_panic(expected = "failed to get Job default/missing")]
    async fn test_must_get_panics_on_missing() {
        let fake = FakeProvider::new();
        let _: Job = must_get(&fake, "default", "missing").await;
    }

    #[tokio::test]
    async fn test_must_wait_until_succeeds() {
        let fake = FakeProvider::new();
        fake.insert(&make_active_job());
        let mut job: Job = object_with_name("default", "migrate");

        must_wait_until(
            &fake,
            &WaitContext::with_timeout(Duration::from_secs(5)),
            &mut [&mut job_is_active(&mut job)],
        )
        .await;

        assert_eq!(job.status.unwrap().active, Some(1));
    }

    #[tokio::test]
    #[should_panic(expected = "wait failed")]
    async fn test_must_wait_until_panics_on_missing_object() {
        let fake = FakeProvider::new();
        let mut job: Job = object_with_name("default", "migrate");

        must_wait_until(
            &fake,
            &WaitContext::with_timeout(Duration::from_secs(5)),
            &mut [&mut job_is_active(&mut job)],
        )
        .await;
    }
}
