// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

/// Chart values handed to `helm install`.
///
/// Helm merges them in flag order: value files first, then `--set`,
/// `--set-string` and `--set-file` entries, later ones winning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValuesOptions {
    pub value_files: Vec<PathBuf>,
    pub values: Vec<String>,
    pub string_values: Vec<String>,
    pub file_values: Vec<String>,
}

impl ValuesOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.value_files.push(path.into());
        self
    }

    /// `key=value`, typed the way helm infers it
    pub fn set(mut self, assignment: impl Into<String>) -> Self {
        self.values.push(assignment.into());
        self
    }

    pub fn set_string(mut self, assignment: impl Into<String>) -> Self {
        self.string_values.push(assignment.into());
        self
    }

    /// `key=path`, the value being the content of the file
    pub fn set_file(mut self, assignment: impl Into<String>) -> Self {
        self.file_values.push(assignment.into());
        self
    }

    pub(crate) fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for file in &self.value_files {
            args.push("--values".to_string());
            args.push(file.to_string_lossy().into_owned());
        }
        for (flag, entries) in [
            ("--set", &self.values),
            ("--set-string", &self.string_values),
            ("--set-file", &self.file_values),
        ] {
            for entry in entries {
                args.push(flag.to_string());
                args.push(entry.clone());
            }
        }
        args
    }
}
