// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Helm client running the `helm` CLI inside a throwaway environment.
//!
//! Every client gets its own kubeconfig file and helm home (repositories,
//! cache, plugins, registry config) in temp storage, so suites never read or
//! modify the user's helm setup.

use super::release::{parse_release, parse_release_list, Release, ReleaseSummary};
use super::values::ValuesOptions;
use crate::cluster::KindCluster;
use crate::constants::helm::{DEFAULT_DRIVER, RELEASE_NAME_LENGTH};
use crate::constants::DEFAULT_NAMESPACE;
use crate::error::{Result, TestutilError};
use crate::names::random_name;
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};
use url::Url;

const EMPTY_REPOSITORIES: &str = "apiVersion: \"\"\ngenerated: \"0001-01-01T00:00:00Z\"\nrepositories: []\n";

#[derive(Debug, Clone)]
pub struct HelmOptions {
    namespace: String,
    driver: String,
}

impl Default for HelmOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            driver: DEFAULT_DRIVER.to_string(),
        }
    }
}

impl HelmOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Namespace releases are installed into and listed from
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Release storage: `secrets` (default), `configmaps` or `memory`
    pub fn driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = driver.into();
        self
    }
}

/// A chart repository to register with `helm repo add`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryEntry {
    pub name: String,
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl RepositoryEntry {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            username: None,
            password: None,
        }
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.url).map_err(|_| {
            TestutilError::HelmError(format!("invalid chart URL format: {}", self.url))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(TestutilError::HelmError(format!(
                "could not find protocol handler for: {}",
                scheme
            ))),
        }
    }

    fn add_args(&self) -> Vec<String> {
        let mut args = vec![
            "repo".to_string(),
            "add".to_string(),
            self.name.clone(),
            self.url.clone(),
        ];
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            args.extend([
                "--username".to_string(),
                username.clone(),
                "--password".to_string(),
                password.clone(),
            ]);
        }
        args
    }
}

/// Helm bound to one cluster; `close` removes its temp storage
pub struct HelmClient {
    kubeconfig: NamedTempFile,
    home: TempDir,
    options: HelmOptions,
}

impl HelmClient {
    /// Set up an isolated helm environment for the cluster behind `kubeconfig`
    pub fn new(kubeconfig: &str, options: HelmOptions) -> Result<Self> {
        let mut kubeconfig_file = tempfile::Builder::new().prefix("kubeconfig-").tempfile()?;
        kubeconfig_file.write_all(kubeconfig.as_bytes())?;
        kubeconfig_file.flush()?;

        let home = tempfile::Builder::new().prefix("helm-").tempdir()?;
        let client = Self {
            kubeconfig: kubeconfig_file,
            home,
            options,
        };
        std::fs::create_dir(client.cache_dir())?;
        std::fs::create_dir(client.plugins_dir())?;
        std::fs::write(client.repository_config(), EMPTY_REPOSITORIES)?;

        debug!(home = %client.home.path().display(), "Helm environment prepared");
        Ok(client)
    }

    pub async fn for_cluster(cluster: &KindCluster, options: HelmOptions) -> Result<Self> {
        let kubeconfig = cluster.kubeconfig().await?;
        Self::new(&kubeconfig, options)
    }

    pub fn namespace(&self) -> &str {
        &self.options.namespace
    }

    /// Register a repository and download its index
    #[instrument(skip(self, entry), fields(repository = %entry.name))]
    pub async fn add_repository(&self, entry: &RepositoryEntry) -> Result<()> {
        entry.validate()?;
        self.run(&entry.add_args()).await?;
        info!("Added chart repository {} ({})", entry.name, entry.url);
        Ok(())
    }

    /// Install `chart` (`repo/name` or a local path).
    ///
    /// An empty `version` means the latest one. Without `release_name` a random
    /// five letter name is used.
    #[instrument(skip(self, values))]
    pub async fn install(
        &self,
        chart: &str,
        version: &str,
        values: &ValuesOptions,
        release_name: Option<&str>,
    ) -> Result<Release> {
        let name = release_name
            .map(str::to_string)
            .unwrap_or_else(|| random_name(RELEASE_NAME_LENGTH));
        let stdout = self.run(&self.install_args(chart, version, values, &name)).await?;
        let release = parse_release(&stdout)?;
        info!(
            "Installed {} as release {} (status {})",
            chart, release.name, release.info.status
        );
        Ok(release)
    }

    #[instrument(skip(self))]
    pub async fn uninstall(&self, release_name: &str) -> Result<()> {
        self.run(&["uninstall", release_name, "--namespace", self.namespace()])
            .await?;
        info!("Uninstalled release {}", release_name);
        Ok(())
    }

    /// Releases in the client's namespace
    pub async fn list(&self) -> Result<Vec<ReleaseSummary>> {
        let stdout = self
            .run(&["list", "--namespace", self.namespace(), "--output", "json"])
            .await?;
        parse_release_list(&stdout)
    }

    /// Remove the kubeconfig file and helm home
    pub fn close(self) -> Result<()> {
        self.kubeconfig.close()?;
        self.home.close()?;
        Ok(())
    }

    fn cache_dir(&self) -> PathBuf {
        self.home.path().join("cache")
    }

    fn plugins_dir(&self) -> PathBuf {
        self.home.path().join("plugins")
    }

    fn repository_config(&self) -> PathBuf {
        self.home.path().join("repositories.yaml")
    }

    fn registry_config(&self) -> PathBuf {
        self.home.path().join("registry.json")
    }

    fn env(&self) -> Vec<(&'static str, OsString)> {
        let home = self.home.path();
        vec![
            ("KUBECONFIG", self.kubeconfig.path().into()),
            ("HELM_NAMESPACE", self.options.namespace.clone().into()),
            ("HELM_DRIVER", self.options.driver.clone().into()),
            ("HELM_CONFIG_HOME", home.join("config").into()),
            ("HELM_DATA_HOME", home.join("data").into()),
            ("HELM_CACHE_HOME", home.join("cache-home").into()),
            ("HELM_PLUGINS", self.plugins_dir().into()),
            ("HELM_REGISTRY_CONFIG", self.registry_config().into()),
            ("HELM_REPOSITORY_CONFIG", self.repository_config().into()),
            ("HELM_REPOSITORY_CACHE", self.cache_dir().into()),
        ]
    }

    fn install_args(
        &self,
        chart: &str,
        version: &str,
        values: &ValuesOptions,
        release_name: &str,
    ) -> Vec<String> {
        let mut args = vec![
            "install".to_string(),
            release_name.to_string(),
            chart.to_string(),
            "--namespace".to_string(),
            self.options.namespace.clone(),
            "--output".to_string(),
            "json".to_string(),
        ];
        if !version.is_empty() {
            args.push("--version".to_string());
            args.push(version.to_string());
        }
        args.extend(values.args());
        args
    }

    async fn run<S: AsRef<str>>(&self, args: &[S]) -> Result<String> {
        let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
        debug!(command = %args.first().copied().unwrap_or_default(), "Running helm");

        let output = Command::new("helm")
            .args(&args)
            .env_clear()
            .envs(inherited_env())
            .envs(self.env())
            .output()
            .await
            .map_err(|e| TestutilError::HelmError(format!("Failed to run helm: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let command = args.iter().take(2).copied().collect::<Vec<_>>().join(" ");
            warn!(%command, %stderr, "helm exited with {}", output.status);
            return Err(TestutilError::HelmError(format!(
                "helm {} failed: {}",
                command, stderr
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Process environment minus anything that would point helm at the user's setup
fn inherited_env() -> impl Iterator<Item = (OsString, OsString)> {
    std::env::vars_os().filter(|(key, _)| {
        let key = key.to_string_lossy();
        key != "KUBECONFIG" && !key.starts_with("HELM_")
    })
}
