// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestutilError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to fetch {target}: {source}")]
    FetchFailed {
        target: String,
        #[source]
        source: kube::Error,
    },

    #[error("Deadline exceeded while waiting for {0}")]
    DeadlineExceeded(String),

    #[error("Wait cancelled while waiting for {0}")]
    Cancelled(String),

    #[error("Invalid owner: {0}")]
    InvalidOwner(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Failed to parse kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Namespace operation failed: {0}")]
    NamespaceError(String),

    #[error("Port forward failed: {0}")]
    PortForwardError(String),

    #[error("Kind cluster operation failed: {0}")]
    ClusterError(String),

    #[error("Helm operation failed: {0}")]
    HelmError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl TestutilError {
    /// True when a wait gave up because its deadline passed
    pub fn is_timeout(&self) -> bool {
        matches!(self, TestutilError::DeadlineExceeded(_))
    }

    /// True when a wait was stopped through its cancellation token
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TestutilError::Cancelled(_))
    }

    /// True when the API server answered 404 for the requested object
    pub fn is_not_found(&self) -> bool {
        let source = match self {
            TestutilError::FetchFailed { source, .. } => source,
            TestutilError::KubeError(source) => source,
            _ => return false,
        };
        matches!(source, kube::Error::Api(response) if response.code == 404)
    }
}

pub type Result<T> = std::result::Result<T, TestutilError>;
