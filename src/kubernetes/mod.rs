// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for CRD discovery and the local object caches.

pub mod crd;
pub mod stores;

pub use crd::wait_for_socialbook_crd;
pub use stores::{caches, ManagedResource, Stores, Writers};
