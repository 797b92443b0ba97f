// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Helpers for testing software deployed to Kubernetes.
//!
//! - [`wait`]: block until objects reach a state, refreshing them in place
//! - [`predicates`]: readiness checks for pods, deployments, replica sets and jobs
//! - [`owner`]: narrow listed objects down to the children of an owner
//! - [`kubernetes`]: an API-server backed provider, namespaces and port forwarding
//! - [`cluster`]: throwaway kind clusters
//! - [`helm`]: chart installs through an isolated helm environment

pub mod cluster;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod harness;
pub mod helm;
pub mod kubernetes;
pub mod names;
pub mod owner;
pub mod predicates;
pub mod provider;
pub mod telemetry;
pub mod types;
pub mod wait;

#[cfg(test)]
mod test_utils;

pub use error::{Result, TestutilError};
pub use kubernetes::{KubeClient, PortForward, PORT_ANY};
pub use names::random_name;
pub use provider::{FakeProvider, ListProvider, NamespacedObject, StateProvider};
pub use types::{object_with_name, ObjectKey};
pub use wait::{Backoff, Condition, ResourceCondition, WaitContext, Waiter};
