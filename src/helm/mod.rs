// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Installing and removing Helm charts from tests.

pub mod client;
pub mod release;
pub mod values;

pub use client::{HelmClient, HelmOptions, RepositoryEntry};
pub use release::{Release, ReleaseInfo, ReleaseSummary};
pub use values::ValuesOptions;
