// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Local kind clusters for end-to-end suites.

pub mod kind;
pub mod kind_config;

pub use kind::{ContainerRuntime, KindCluster, KindOptions};
pub use kind_config::{KindConfig, KindNetworking, KindNode, NodeRole, PortMapping};
