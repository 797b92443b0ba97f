// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Matching core/v1 events to the object they are about.

use k8s_openapi::api::core::v1::Event;
use kube::{Resource, ResourceExt};

/// Keep the events whose involved object has the kind, apiVersion and name of `obj`
pub fn filter_events<K>(events: Vec<Event>, obj: &K) -> Vec<Event>
where
    K: Resource<DynamicType = ()>,
{
    let kind = K::kind(&());
    let api_version = K::api_version(&());
    let name = obj.name_any();

    events
        .into_iter()
        .filter(|e| {
            let involved = &e.involved_object;
            involved.kind.as_deref() == Some(kind.as_ref())
                && involved.api_version.as_deref() == Some(api_version.as_ref())
                && involved.name.as_deref() == Some(name.as_str())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::object_with_name;
    use k8s_openapi::api::apps::v1::Deployment;
    use k8s_openapi::api::core::v1::{ObjectReference, Pod};

    fn make_event(reason: &str, api_version: &str, kind: &str, name: &str) -> Event {
        Event {
            reason: Some(reason.to_string()),
            involved_object: ObjectReference {
                api_version: Some(api_version.to_string()),
                kind: Some(kind.to_string()),
                name: Some(name.to_string()),
                namespace: Some("default".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_filter_events_matches_kind_version_and_name() {
        let events = vec![
            make_event("Scheduled", "v1", "Pod", "web-0"),
            make_event("Pulled", "v1", "Pod", "web-1"),
            make_event("ScalingReplicaSet", "apps/v1", "Deployment", "web-0"),
            make_event("Started", "v1", "Pod", "web-0"),
        ];
        let pod: Pod = object_with_name("default", "web-0");

        let reasons: Vec<String> = filter_events(events, &pod)
            .into_iter()
            .filter_map(|e| e.reason)
            .collect();

        assert_eq!(reasons, vec!["Scheduled", "Started"]);
    }

    #[test]
    fn test_filter_events_ignores_other_api_versions() {
        let events = vec![
            make_event("ScalingReplicaSet", "extensions/v1beta1", "Deployment", "api"),
            make_event("ScalingReplicaSet", "apps/v1", "Deployment", "api"),
        ];
        let deployment: Deployment = object_with_name("default", "api");

        assert_eq!(filter_events(events, &deployment).len(), 1);
    }

    #[test]
    fn test_filter_events_empty() {
        let pod: Pod = object_with_name("default", "web-0");
        assert!(filter_events(vec![], &pod).is_empty());
    }
}
