// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Dependent objects owned by a SocialBook.
//!
//! | Kind | Name | Tier |
//! |------|------|------|
//! | ConfigMap | `<name>-cm` | shared |
//! | PersistentVolume | `<name>-pv` | backend |
//! | PersistentVolumeClaim | `<name>-pvc` | backend |
//! | Deployment / Service | `<name>-mongo` | backend |
//! | NetworkPolicy (ingress) | `<name>-mongo-np` | backend |
//! | Deployment / Service | `<name>` | frontend |
//! | NetworkPolicy (egress) | `<name>-np` | frontend |
//!
//! Later objects refer to earlier ones by these names, so the provisioning order in
//! [`BACKEND_PLAN`] and [`FRONTEND_PLAN`] follows those references.

pub mod common;
pub mod configmap;
pub mod deployment;
pub mod names;
pub mod network_policy;
pub mod service;
pub mod storage;

use crate::error::Result;
use crate::types::SocialBook;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, PersistentVolume, PersistentVolumeClaim, Service};
use k8s_openapi::api::networking::v1::NetworkPolicy;

pub use common::{is_controlled_by, object_meta, owner_reference, standard_labels};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// MongoDB
    Backend,
    /// social-book server
    Frontend,
}

/// The finite set of dependent kinds the reconciler manages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependentKind {
    ConfigMap,
    PersistentVolume,
    PersistentVolumeClaim,
    Deployment(Tier),
    Service(Tier),
    NetworkPolicy(Tier),
}

/// Backend provisioning order
pub const BACKEND_PLAN: [DependentKind; 6] = [
    DependentKind::ConfigMap,
    DependentKind::PersistentVolume,
    DependentKind::PersistentVolumeClaim,
    DependentKind::Deployment(Tier::Backend),
    DependentKind::Service(Tier::Backend),
    DependentKind::NetworkPolicy(Tier::Backend),
];

/// Frontend provisioning order
pub const FRONTEND_PLAN: [DependentKind; 3] = [
    DependentKind::Deployment(Tier::Frontend),
    DependentKind::Service(Tier::Frontend),
    DependentKind::NetworkPolicy(Tier::Frontend),
];

/// A freshly built dependent object, tagged by kind
#[derive(Debug, Clone)]
pub enum DependentObject {
    ConfigMap(ConfigMap),
    PersistentVolume(PersistentVolume),
    PersistentVolumeClaim(PersistentVolumeClaim),
    Deployment(Deployment),
    Service(Service),
    NetworkPolicy(NetworkPolicy),
}

impl DependentKind {
    /// Kubernetes kind, for logs and conflict errors
    pub fn kind(&self) -> &'static str {
        match self {
            DependentKind::ConfigMap => "ConfigMap",
            DependentKind::PersistentVolume => "PersistentVolume",
            DependentKind::PersistentVolumeClaim => "PersistentVolumeClaim",
            DependentKind::Deployment(_) => "Deployment",
            DependentKind::Service(_) => "Service",
            DependentKind::NetworkPolicy(_) => "NetworkPolicy",
        }
    }

    /// Deterministic object name derived from the owning SocialBook
    pub fn object_name(&self, sb: &SocialBook) -> String {
        match self {
            DependentKind::ConfigMap => names::config_map(sb),
            DependentKind::PersistentVolume => names::persistent_volume(sb),
            DependentKind::PersistentVolumeClaim => names::persistent_volume_claim(sb),
            DependentKind::Deployment(Tier::Backend) | DependentKind::Service(Tier::Backend) => {
                names::backend(sb)
            }
            DependentKind::Deployment(Tier::Frontend) | DependentKind::Service(Tier::Frontend) => {
                names::frontend(sb)
            }
            DependentKind::NetworkPolicy(Tier::Backend) => names::backend_network_policy(sb),
            DependentKind::NetworkPolicy(Tier::Frontend) => names::frontend_network_policy(sb),
        }
    }

    /// Build the desired object body for this kind
    pub fn build(&self, sb: &SocialBook) -> Result<DependentObject> {
        Ok(match self {
            DependentKind::ConfigMap => DependentObject::ConfigMap(configmap::config_map(sb)?),
            DependentKind::PersistentVolume => {
                DependentObject::PersistentVolume(storage::persistent_volume(sb)?)
            }
            DependentKind::PersistentVolumeClaim => {
                DependentObject::PersistentVolumeClaim(storage::persistent_volume_claim(sb)?)
            }
            DependentKind::Deployment(Tier::Backend) => {
                DependentObject::Deployment(deployment::backend(sb)?)
            }
            DependentKind::Deployment(Tier::Frontend) => {
                DependentObject::Deployment(deployment::frontend(sb)?)
            }
            DependentKind::Service(Tier::Backend) => DependentObject::Service(service::backend(sb)?),
            DependentKind::Service(Tier::Frontend) => {
                DependentObject::Service(service::frontend(sb)?)
            }
            DependentKind::NetworkPolicy(Tier::Backend) => {
                DependentObject::NetworkPolicy(network_policy::backend_ingress(sb)?)
            }
            DependentKind::NetworkPolicy(Tier::Frontend) => {
                DependentObject::NetworkPolicy(network_policy::frontend_egress(sb)?)
            }
        })
    }
}
