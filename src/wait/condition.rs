// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{Result, TestutilError};
use crate::provider::{NamespacedObject, StateProvider};
use crate::types::ObjectKey;
use async_trait::async_trait;

/// Something a wait can check and bring up to date.
///
/// `evaluate` must be pure: it only looks at the state already held in
/// memory. `refresh` replaces that state with the provider's latest copy.
#[async_trait]
pub trait Condition<P: StateProvider>: Send {
    fn evaluate(&self) -> bool;

    /// Key of the object this condition observes
    fn target(&self) -> ObjectKey;

    /// Human readable description used in logs and errors
    fn describe(&self) -> String {
        self.target().to_string()
    }

    async fn refresh(&mut self, provider: &P) -> Result<()>;
}

type Predicate<'a, K> = Box<dyn Fn(&K) -> bool + Send + Sync + 'a>;

/// A predicate over an object borrowed from the caller.
///
/// The wait overwrites the borrowed object on every refresh, so once the
/// condition is dropped the caller sees the last fetched state.
pub struct ResourceCondition<'a, K> {
    subject: &'a mut K,
    expectation: String,
    check: Predicate<'a, K>,
}

impl<'a, K: NamespacedObject> ResourceCondition<'a, K> {
    /// `expectation` completes the sentence "waiting for <kind> <ns/name> to be ..."
    pub fn new(
        subject: &'a mut K,
        expectation: impl Into<String>,
        check: impl Fn(&K) -> bool + Send + Sync + 'a,
    ) -> Self {
        Self {
            subject,
            expectation: expectation.into(),
            check: Box::new(check),
        }
    }

    pub fn subject(&self) -> &K {
        &*self.subject
    }

    pub fn is_satisfied(&self) -> bool {
        (self.check)(&*self.subject)
    }

    pub fn key(&self) -> ObjectKey {
        ObjectKey::from_resource(&*self.subject)
    }

    fn label(&self) -> String {
        format!("{} {}", K::kind(&()), self.key())
    }
}

#[async_trait]
impl<'a, K, P> Condition<P> for ResourceCondition<'a, K>
where
    K: NamespacedObject,
    P: StateProvider,
{
    fn evaluate(&self) -> bool {
        self.is_satisfied()
    }

    fn target(&self) -> ObjectKey {
        self.key()
    }

    fn describe(&self) -> String {
        format!("{} to be {}", self.label(), self.expectation)
    }

    async fn refresh(&mut self, provider: &P) -> Result<()> {
        let key = self.key();
        if key.name.is_empty() {
            return Err(TestutilError::InvalidTarget(format!(
                "{} has no name to fetch it by",
                K::kind(&())
            )));
        }

        let latest: K = provider
            .fetch(&key)
            .await
            .map_err(|source| TestutilError::FetchFailed {
                target: self.label(),
                source,
            })?;
        *self.subject = latest;
        Ok(())
    }
}
