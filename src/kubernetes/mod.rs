// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! API-server client, namespace management and pod port forwarding.

pub mod client;
pub mod namespaces;
pub mod portforward;

pub use crate::constants::portforward::PORT_ANY;
pub use client::KubeClient;
pub use portforward::PortForward;
