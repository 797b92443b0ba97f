// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Narrowing listed objects down to the children of an owner.

use crate::error::{Result, TestutilError};
use crate::provider::{ListProvider, NamespacedObject};
use crate::types::ObjectKey;
use kube::{Resource, ResourceExt};
use tracing::{debug, instrument};

/// UID of an owner, rejecting owners that have not been persisted yet
fn owner_uid<O: Resource>(owner: &O) -> Result<&str> {
    match owner.meta().uid.as_deref() {
        Some(uid) if !uid.is_empty() => Ok(uid),
        _ => Err(TestutilError::InvalidOwner(format!(
            "owner {} has no UID, it must be fetched from the cluster first",
            owner.name_any()
        ))),
    }
}

/// True when any of the child's owner references points at `uid`
pub fn is_owned_by<K: Resource>(child: &K, uid: &str) -> bool {
    child.owner_references().iter().any(|r| r.uid == uid)
}

/// Keep the candidates owned by `owner`, in their original order.
///
/// A child with several owners is kept as soon as one reference matches.
pub fn filter_by_owner<K, O>(candidates: Vec<K>, owner: &O) -> Result<Vec<K>>
where
    K: Resource,
    O: Resource,
{
    let uid = owner_uid(owner)?;
    Ok(candidates
        .into_iter()
        .filter(|child| is_owned_by(child, uid))
        .collect())
}

/// List the objects of type `K` in the owner's namespace that `owner` owns
#[instrument(skip_all, fields(owner = %ObjectKey::from_resource(owner), kind = %K::kind(&())))]
pub async fn list_owned<K, O, L>(provider: &L, owner: &O) -> Result<Vec<K>>
where
    K: NamespacedObject,
    O: Resource,
    L: ListProvider,
{
    owner_uid(owner)?;
    let namespace = ObjectKey::from_resource(owner).namespace;

    let candidates: Vec<K> = provider.list(&namespace, None).await?;
    let total = candidates.len();
    let owned = filter_by_owner(candidates, owner)?;

    debug!("{} of {} listed objects belong to the owner", owned.len(), total);
    Ok(owned)
}
