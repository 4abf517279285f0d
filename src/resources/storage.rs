// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Host-path volume and the claim that binds it for the MongoDB data directory

use crate::constants::storage::{ACCESS_MODE, CAPACITY, HOST_PATH};
use crate::error::Result;
use crate::resources::{names, object_meta};
use crate::types::SocialBook;
use k8s_openapi::api::core::v1::{
    HostPathVolumeSource, ObjectReference, PersistentVolume, PersistentVolumeClaim,
    PersistentVolumeClaimSpec, PersistentVolumeSpec, VolumeResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::ResourceExt;
use std::collections::BTreeMap;

fn storage_request() -> BTreeMap<String, Quantity> {
    BTreeMap::from([("storage".to_string(), Quantity(CAPACITY.to_string()))])
}

/// Cluster-scoped volume, pre-bound to the claim in the SocialBook's namespace
pub fn persistent_volume(sb: &SocialBook) -> Result<PersistentVolume> {
    Ok(PersistentVolume {
        metadata: object_meta(sb, names::persistent_volume(sb), false)?,
        spec: Some(PersistentVolumeSpec {
            access_modes: Some(vec![ACCESS_MODE.to_string()]),
            persistent_volume_reclaim_policy: Some("Delete".to_string()),
            capacity: Some(storage_request()),
            claim_ref: Some(ObjectReference {
                namespace: sb.namespace(),
                name: Some(names::persistent_volume_claim(sb)),
                ..Default::default()
            }),
            host_path: Some(HostPathVolumeSource {
                path: HOST_PATH.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    })
}

pub fn persistent_volume_claim(sb: &SocialBook) -> Result<PersistentVolumeClaim> {
    Ok(PersistentVolumeClaim {
        metadata: object_meta(sb, names::persistent_volume_claim(sb), true)?,
        spec: Some(PersistentVolumeClaimSpec {
            access_modes: Some(vec![ACCESS_MODE.to_string()]),
            resources: Some(VolumeResourceRequirements {
                requests: Some(storage_request()),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    })
}
