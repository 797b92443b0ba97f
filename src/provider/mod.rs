// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Sources of object state for the wait engine and owner lookups.
//!
//! The engine only needs "fetch this object by key" and the owner lookups
//! only need "list these objects in a namespace". `KubeClient` answers both
//! from the API server, `FakeProvider` answers them from memory.

use crate::types::ObjectKey;
use async_trait::async_trait;
use k8s_openapi::NamespaceResourceScope;
use kube::Resource;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

pub mod fake;

pub use fake::FakeProvider;

/// Namespaced Kubernetes types the providers can fetch and list
pub trait NamespacedObject:
    Resource<Scope = NamespaceResourceScope, DynamicType = ()>
    + Clone
    + Debug
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
}

impl<K> NamespacedObject for K where
    K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + Clone
        + Debug
        + DeserializeOwned
        + Send
        + Sync
        + 'static
{
}

/// Fetches the latest representation of a single object
#[async_trait]
pub trait StateProvider: Send + Sync {
    async fn fetch<K: NamespacedObject>(&self, key: &ObjectKey) -> Result<K, kube::Error>;
}

/// Lists the objects of one type within a namespace
#[async_trait]
pub trait ListProvider: Send + Sync {
    /// `label_selector` uses the API server's syntax, e.g. `app=web,tier!=cache`
    async fn list<K: NamespacedObject>(
        &self,
        namespace: &str,
        label_selector: Option<&str>,
    ) -> Result<Vec<K>, kube::Error>;
}
