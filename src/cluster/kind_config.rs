// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed `kind.x-k8s.io/v1alpha4` cluster configuration.

use crate::error::{Result, TestutilError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use tempfile::NamedTempFile;

pub const KIND_API_VERSION: &str = "kind.x-k8s.io/v1alpha4";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindConfig {
    pub kind: String,
    pub api_version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<KindNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networking: Option<KindNetworking>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containerd_config_patches: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeRole {
    ControlPlane,
    Worker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindNode {
    pub role: NodeRole,
    /// Overrides the cluster-wide node image for this node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_port_mappings: Vec<PortMapping>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    pub container_port: u16,
    pub host_port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listen_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindNetworking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_server_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_server_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_subnet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_subnet: Option<String>,
    #[serde(rename = "disableDefaultCNI", default, skip_serializing_if = "std::ops::Not::not")]
    pub disable_default_cni: bool,
}

impl KindNode {
    pub fn new(role: NodeRole) -> Self {
        Self {
            role,
            image: None,
            extra_port_mappings: Vec::new(),
            labels: BTreeMap::new(),
        }
    }
}

impl Default for KindConfig {
    /// A single control-plane node, which is what `kind` creates without a config
    fn default() -> Self {
        Self {
            kind: "Cluster".to_string(),
            api_version: KIND_API_VERSION.to_string(),
            nodes: vec![KindNode::new(NodeRole::ControlPlane)],
            networking: None,
            containerd_config_patches: Vec::new(),
        }
    }
}

impl KindConfig {
    /// One control-plane node plus `workers` worker nodes
    pub fn with_workers(workers: usize) -> Self {
        let mut config = Self::default();
        config
            .nodes
            .extend((0..workers).map(|_| KindNode::new(NodeRole::Worker)));
        config
    }

    pub fn node(mut self, node: KindNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn networking(mut self, networking: KindNetworking) -> Self {
        self.networking = Some(networking);
        self
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            TestutilError::ClusterError(format!("Failed to serialize kind config: {}", e))
        })
    }

    /// Write the config to a temp file suitable for `kind create cluster --config`
    pub fn write_temp_file(&self) -> Result<NamedTempFile> {
        let yaml = self.to_yaml()?;
        let mut file = tempfile::Builder::new()
            .prefix("kind-config-")
            .suffix(".yaml")
            .tempfile()?;
        file.write_all(yaml.as_bytes())?;
        file.flush()?;
        Ok(file)
    }
}
