// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::DEFAULT_NAMESPACE;
use kube::{api::ObjectMeta, Resource, ResourceExt};
use std::fmt;

/// Namespace and name of a Kubernetes object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Build the key of an object from its metadata.
    /// Objects without a namespace are assumed to live in `default`.
    pub fn from_resource<K: Resource>(obj: &K) -> Self {
        Self {
            namespace: obj
                .namespace()
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            name: obj.meta().name.clone().unwrap_or_default(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Create an otherwise empty object that only carries its namespace and name.
///
/// Handy as the starting point of a wait: the first refresh fills in the rest.
pub fn object_with_name<K>(namespace: &str, name: &str) -> K
where
    K: Resource + Default,
{
    let mut obj = K::default();
    *obj.meta_mut() = ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        ..Default::default()
    };
    obj
}
