// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::constants::poll::DEFAULT_TIMEOUT_SECS;
use crate::wait::WaitContext;

/// Test-suite configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-existing kind cluster to run against instead of creating one
    pub kind_cluster: Option<String>,
    /// Keep clusters created by the suite after it finishes
    pub keep_cluster: bool,
    /// Node image override for newly created clusters
    pub node_image: Option<String>,
    pub wait_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            kind_cluster: None,
            keep_cluster: false,
            node_image: None,
            wait_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let keep_cluster = match non_empty("TESTUTIL_KEEP_CLUSTER") {
            Some(v) => v
                .parse()
                .with_context(|| format!("TESTUTIL_KEEP_CLUSTER must be true or false, got '{}'", v))?,
            None => false,
        };

        let wait_timeout = match non_empty("TESTUTIL_WAIT_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(
                v.parse()
                    .with_context(|| format!("TESTUTIL_WAIT_TIMEOUT_SECS is not a number: '{}'", v))?,
            ),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Config {
            kind_cluster: non_empty("TESTUTIL_KIND_CLUSTER"),
            keep_cluster,
            node_image: non_empty("TESTUTIL_NODE_IMAGE"),
            wait_timeout,
        })
    }

    /// A wait context bounded by the configured timeout
    pub fn wait_context(&self) -> WaitContext {
        WaitContext::with_timeout(self.wait_timeout)
    }
}
