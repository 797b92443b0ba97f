// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Object identity helpers shared by providers, conditions and lookups.

pub mod object_key;

pub use object_key::{object_with_name, ObjectKey};
