// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Condition-based waiting on Kubernetes objects.
//!
//! ```no_run
//! use kube_testutil::wait::{conditions::deployment_is_ready, WaitContext};
//! use kube_testutil::{object_with_name, KubeClient};
//! use k8s_openapi::api::apps::v1::Deployment;
//! use std::time::Duration;
//!
//! # async fn run() -> kube_testutil::Result<()> {
//! let client = KubeClient::try_default().await?;
//! let mut deployment: Deployment = object_with_name("default", "api");
//!
//! let ctx = WaitContext::with_timeout(Duration::from_secs(60));
//! client
//!     .wait_until(&ctx, &mut [&mut deployment_is_ready(&mut deployment)])
//!     .await?;
//!
//! // `deployment` now holds the state that satisfied the condition
//! # Ok(())
//! # }
//! ```

mod backoff;
mod condition;
pub mod conditions;
mod context;
mod engine;

pub use backoff::Backoff;
pub use condition::{Condition, ResourceCondition};
pub use context::{Interrupt, WaitContext};
pub use engine::Waiter;
