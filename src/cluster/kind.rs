// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Ephemeral kind clusters driven through the `kind` CLI.

use crate::cluster::KindConfig;
use crate::config::Config;
use crate::constants::kind::{DEFAULT_NODE_IMAGE, NAME_LENGTH, PROVIDER_ENV};
use crate::error::{Result, TestutilError};
use crate::kubernetes::KubeClient;
use crate::names::random_name;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Container runtime kind runs its nodes in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContainerRuntime {
    #[default]
    Docker,
    Podman,
}

impl ContainerRuntime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerRuntime::Docker => "docker",
            ContainerRuntime::Podman => "podman",
        }
    }
}

#[derive(Debug, Clone)]
pub struct KindOptions {
    name: String,
    use_existing: bool,
    do_not_delete: bool,
    wait_for_ready: Option<Duration>,
    config: Option<KindConfig>,
    node_image: String,
    runtime: ContainerRuntime,
}

impl Default for KindOptions {
    fn default() -> Self {
        Self {
            name: random_name(NAME_LENGTH),
            use_existing: false,
            do_not_delete: false,
            wait_for_ready: None,
            config: None,
            node_image: DEFAULT_NODE_IMAGE.to_string(),
            runtime: ContainerRuntime::default(),
        }
    }
}

impl KindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options derived from the suite configuration.
    ///
    /// A configured `kind_cluster` is reused and never deleted by the suite.
    pub fn from_config(config: &Config) -> Self {
        let mut options = Self::default().do_not_delete(config.keep_cluster);
        if let Some(name) = &config.kind_cluster {
            options = options.name(name).use_existing(true).do_not_delete(true);
        }
        if let Some(image) = &config.node_image {
            options = options.node_image(image);
        }
        options
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Reuse a cluster with the same name instead of creating one
    pub fn use_existing(mut self, use_existing: bool) -> Self {
        self.use_existing = use_existing;
        self
    }

    pub fn do_not_delete(mut self, do_not_delete: bool) -> Self {
        self.do_not_delete = do_not_delete;
        self
    }

    pub fn wait_for_ready(mut self, wait: Duration) -> Self {
        self.wait_for_ready = Some(wait);
        self
    }

    pub fn config(mut self, config: KindConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn node_image(mut self, image: impl Into<String>) -> Self {
        self.node_image = image.into();
        self
    }

    pub fn runtime(mut self, runtime: ContainerRuntime) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn cluster_name(&self) -> &str {
        &self.name
    }

    fn create_args(&self, config_path: Option<&Path>) -> Vec<String> {
        let mut args = vec![
            "create".to_string(),
            "cluster".to_string(),
            "--name".to_string(),
            self.name.clone(),
            "--image".to_string(),
            self.node_image.clone(),
        ];
        if let Some(wait) = self.wait_for_ready {
            args.push("--wait".to_string());
            args.push(format!("{}s", wait.as_secs()));
        }
        if let Some(path) = config_path {
            args.push("--config".to_string());
            args.push(path.to_string_lossy().into_owned());
        }
        args
    }
}

/// A kind cluster owned (or borrowed, when reused) by a test suite
#[derive(Debug)]
pub struct KindCluster {
    name: String,
    runtime: ContainerRuntime,
    do_not_delete: bool,
}

impl KindCluster {
    /// Create a cluster, or attach to an existing one when `use_existing` is set
    #[instrument(skip(options), fields(cluster_name = %options.name, runtime = options.runtime.as_str()))]
    pub async fn create(options: KindOptions) -> Result<Self> {
        let cluster = KindCluster {
            name: options.name.clone(),
            runtime: options.runtime,
            do_not_delete: options.do_not_delete,
        };

        if options.use_existing && cluster.exists().await? {
            info!("Reusing existing kind cluster {}", cluster.name);
            return Ok(cluster);
        }

        info!("Creating kind cluster {}", cluster.name);
        // The file must outlive the kind invocation.
        let config_file = options
            .config
            .as_ref()
            .map(KindConfig::write_temp_file)
            .transpose()?;
        let args = options.create_args(config_file.as_ref().map(|f| f.path()));
        run_kind(cluster.runtime, &args).await?;

        info!("Kind cluster {} created successfully", cluster.name);
        Ok(cluster)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether kind currently lists a cluster with this name
    pub async fn exists(&self) -> Result<bool> {
        let stdout = run_kind(self.runtime, &["get", "clusters"]).await?;
        Ok(is_listed(&stdout, &self.name))
    }

    /// External kubeconfig document for the cluster
    pub async fn kubeconfig(&self) -> Result<String> {
        run_kind(self.runtime, &["get", "kubeconfig", "--name", &self.name]).await
    }

    /// Kubeconfig written to a temp file that is removed when dropped
    pub async fn kubeconfig_temp_file(&self) -> Result<NamedTempFile> {
        let kubeconfig = self.kubeconfig().await?;
        let mut file = tempfile::Builder::new()
            .prefix("kubeconfig-")
            .tempfile()?;
        file.write_all(kubeconfig.as_bytes())?;
        file.flush()?;
        Ok(file)
    }

    pub async fn client(&self) -> Result<KubeClient> {
        let kubeconfig = self.kubeconfig().await?;
        KubeClient::from_kubeconfig(&kubeconfig).await
    }

    #[instrument(skip(self), fields(cluster_name = %self.name))]
    pub async fn delete(&self) -> Result<()> {
        info!("Deleting kind cluster {}", self.name);
        run_kind(self.runtime, &["delete", "cluster", "--name", &self.name]).await?;
        debug!("Kind cluster {} deleted", self.name);
        Ok(())
    }

    /// Release the cluster; deletes it unless it was marked `do_not_delete`
    pub async fn close(self) -> Result<()> {
        if self.do_not_delete {
            debug!("Keeping kind cluster {}", self.name);
            return Ok(());
        }
        self.delete().await
    }
}

fn is_listed(output: &str, name: &str) -> bool {
    output.lines().any(|line| line.trim() == name)
}

async fn run_kind<S: AsRef<str>>(runtime: ContainerRuntime, args: &[S]) -> Result<String> {
    let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
    debug!(?args, "Running kind");

    let output = Command::new("kind")
        .args(&args)
        .env(PROVIDER_ENV, runtime.as_str())
        .output()
        .await
        .map_err(|e| TestutilError::ClusterError(format!("Failed to run kind: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!(?args, %stderr, "kind exited with {}", output.status);
        return Err(TestutilError::ClusterError(format!(
            "kind {} failed: {}",
            args.join(" "),
            stderr
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
