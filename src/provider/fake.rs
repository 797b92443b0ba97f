// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! In-memory provider for exercising waits and lookups without a cluster.

use super::{ListProvider, NamespacedObject, StateProvider};
use crate::types::ObjectKey;
use async_trait::async_trait;
use kube::core::ErrorResponse;
use kube::ResourceExt;
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Slot = (TypeId, ObjectKey);

enum Reply {
    Object(Arc<dyn Any + Send + Sync>),
    NotFound,
}

#[derive(Default)]
struct FakeState {
    objects: BTreeMap<Slot, Arc<dyn Any + Send + Sync>>,
    scripted: HashMap<Slot, VecDeque<Reply>>,
    fetches: usize,
    lists: usize,
}

/// Provider backed by a map of objects, with optional scripted replies.
///
/// A fetch first consumes the next scripted reply for that object (if any),
/// which replaces or removes the stored object, and then answers with
/// whatever is stored. Clones share state.
#[derive(Clone, Default)]
pub struct FakeProvider {
    state: Arc<Mutex<FakeState>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object, replacing any previous version
    pub fn insert<K: NamespacedObject>(&self, obj: &K) {
        let slot = slot_of(obj);
        self.lock().objects.insert(slot, Arc::new(obj.clone()));
    }

    /// Queue a version of the object that the next unanswered fetch returns
    pub fn push_update<K: NamespacedObject>(&self, obj: &K) {
        let slot = slot_of(obj);
        self.lock()
            .scripted
            .entry(slot)
            .or_default()
            .push_back(Reply::Object(Arc::new(obj.clone())));
    }

    /// Queue a reply that deletes the object and answers 404
    pub fn push_not_found<K: NamespacedObject>(&self, key: &ObjectKey) {
        self.lock()
            .scripted
            .entry((TypeId::of::<K>(), key.clone()))
            .or_default()
            .push_back(Reply::NotFound);
    }

    /// Number of fetch calls served so far
    pub fn fetch_count(&self) -> usize {
        self.lock().fetches
    }

    /// Number of list calls served so far
    pub fn list_count(&self) -> usize {
        self.lock().lists
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl StateProvider for FakeProvider {
    async fn fetch<K: NamespacedObject>(&self, key: &ObjectKey) -> Result<K, kube::Error> {
        let mut state = self.lock();
        state.fetches += 1;

        let slot = (TypeId::of::<K>(), key.clone());
        match state.scripted.get_mut(&slot).and_then(VecDeque::pop_front) {
            Some(Reply::Object(obj)) => {
                state.objects.insert(slot.clone(), obj);
            }
            Some(Reply::NotFound) => {
                state.objects.remove(&slot);
            }
            None => {}
        }

        state
            .objects
            .get(&slot)
            .and_then(|obj| obj.downcast_ref::<K>())
            .cloned()
            .ok_or_else(|| not_found(&K::kind(&()), key))
    }
}

#[async_trait]
impl ListProvider for FakeProvider {
    async fn list<K: NamespacedObject>(
        &self,
        namespace: &str,
        label_selector: Option<&str>,
    ) -> Result<Vec<K>, kube::Error> {
        let mut state = self.lock();
        state.lists += 1;

        Ok(state
            .objects
            .iter()
            .filter(|((type_id, key), _)| *type_id == TypeId::of::<K>() && key.namespace == namespace)
            .filter_map(|(_, obj)| obj.downcast_ref::<K>())
            .filter(|obj| matches_selector(obj.labels(), label_selector))
            .cloned()
            .collect())
    }
}

fn slot_of<K: NamespacedObject>(obj: &K) -> Slot {
    (TypeId::of::<K>(), ObjectKey::from_resource(obj))
}

fn not_found(kind: &str, key: &ObjectKey) -> kube::Error {
    kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: format!("{} \"{}\" not found", kind, key.name),
        reason: "NotFound".to_string(),
        code: 404,
    })
}

/// Equality-based selector matching: `k=v`, `k==v`, `k!=v` and bare `k`
fn matches_selector(labels: &BTreeMap<String, String>, selector: Option<&str>) -> bool {
    let Some(selector) = selector else {
        return true;
    };

    selector
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .all(|term| {
            if let Some((key, value)) = term.split_once("!=") {
                labels.get(key.trim()).map(String::as_str) != Some(value.trim())
            } else if let Some((key, value)) = term.split_once('=') {
                let value = value.trim_start_matches('=').trim();
                labels.get(key.trim()).map(String::as_str) == Some(value)
            } else {
                labels.contains_key(term)
            }
        })
}
