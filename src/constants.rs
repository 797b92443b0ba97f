// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Namespace assumed for objects that do not carry one
pub const DEFAULT_NAMESPACE: &str = "default";

/// Polling configuration for the wait engine
pub mod poll {
    /// Initial delay in milliseconds between two fetches of the same object
    pub const INITIAL_INTERVAL_MILLIS: u64 = 100;
    /// Maximum delay in milliseconds (exponential backoff cap)
    pub const MAX_INTERVAL_MILLIS: u64 = 2_000;
    /// Default overall wait timeout in seconds used by `Config`
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
}

/// Port-forward session configuration
pub mod portforward {
    /// Local port value that lets the OS pick a free port
    pub const PORT_ANY: u16 = 0;
    /// How long a new session may take to become ready
    pub const READY_TIMEOUT_SECS: u64 = 30;
    /// Local interface the forwarded port is bound to
    pub const BIND_ADDRESS: &str = "127.0.0.1";
}

/// Kind cluster defaults
pub mod kind {
    /// Node image used when none is configured
    pub const DEFAULT_NODE_IMAGE: &str = "kindest/node:v1.16.4";
    /// Length of generated cluster names
    pub const NAME_LENGTH: usize = 10;
    /// Environment variable kind reads to select the container runtime
    pub const PROVIDER_ENV: &str = "KIND_EXPERIMENTAL_PROVIDER";
}

/// Helm client defaults
pub mod helm {
    /// Release storage backend, as `HELM_DRIVER` understands it
    pub const DEFAULT_DRIVER: &str = "secrets";
    /// Length of generated release names
    pub const RELEASE_NAME_LENGTH: usize = 5;
}
