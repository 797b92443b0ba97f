// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Release records as printed by `helm ... --output json`.

use crate::error::{Result, TestutilError};
use serde::Deserialize;

/// A release as returned by `helm install --output json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Release {
    pub name: String,
    pub namespace: String,
    /// Revision number, 1 for a fresh install
    pub version: i32,
    pub info: ReleaseInfo,
    /// User supplied values the release was rendered with
    #[serde(default)]
    pub config: serde_json::Value,
    #[serde(default)]
    pub manifest: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReleaseInfo {
    pub status: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One row of `helm list --output json`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReleaseSummary {
    pub name: String,
    pub namespace: String,
    pub revision: String,
    #[serde(default)]
    pub updated: String,
    pub status: String,
    pub chart: String,
    #[serde(default)]
    pub app_version: String,
}

pub(crate) fn parse_release(output: &str) -> Result<Release> {
    serde_json::from_str(output)
        .map_err(|e| TestutilError::HelmError(format!("Failed to parse release: {}", e)))
}

pub(crate) fn parse_release_list(output: &str) -> Result<Vec<ReleaseSummary>> {
    if output.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(output)
        .map_err(|e| TestutilError::HelmError(format!("Failed to parse release list: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release() {
        let output = r#"{
            "name": "minio",
            "info": {
                "first_deployed": "2026-10-18T10:00:00Z",
                "status": "deployed",
                "description": "Install complete",
                "notes": "Get the endpoint with kubectl"
            },
            "chart": { "metadata": { "name": "minio", "version": "5.0.0" } },
            "config": { "replicas": 1 },
            "manifest": "---\nkind: Service\n",
            "version": 1,
            "namespace": "default"
        }"#;

        let release = parse_release(output).unwrap();

        assert_eq!(release.name, "minio");
        assert_eq!(release.version, 1);
        assert_eq!(release.info.status, "deployed");
        assert_eq!(release.config["replicas"], 1);
    }

    #[test]
    fn test_parse_release_rejects_garbage() {
        let err = parse_release("Error: chart not found").unwrap_err();
        assert!(matches!(err, TestutilError::HelmError(_)));
    }

    #[test]
    fn test_parse_release_list() {
        let output = r#"[
            {"name":"minio","namespace":"default","revision":"2","updated":"2026-10-18 10:00:00 +0000 UTC","status":"deployed","chart":"minio-5.0.0","app_version":"RELEASE.2024"},
            {"name":"redis","namespace":"default","revision":"1","updated":"2026-10-18 10:01:00 +0000 UTC","status":"failed","chart":"redis-18.1.0","app_version":"7.2"}
        ]"#;

        let releases = parse_release_list(output).unwrap();

        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0].revision, "2");
        assert_eq!(releases[1].status, "failed");
    }

    #[test]
    fn test_parse_empty_release_list() {
        assert!(parse_release_list("").unwrap().is_empty());
        assert!(parse_release_list("[]\n").unwrap().is_empty());
    }
}
