// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Restricts MongoDB traffic to the frontend pods, in both directions

use crate::constants::mongo;
use crate::error::Result;
use crate::resources::common::app_selector;
use crate::resources::{names, object_meta};
use crate::types::SocialBook;
use k8s_openapi::api::networking::v1::{
    NetworkPolicy, NetworkPolicyEgressRule, NetworkPolicyIngressRule, NetworkPolicyPeer,
    NetworkPolicyPort, NetworkPolicySpec,
};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

fn peer(pod_label: String) -> Vec<NetworkPolicyPeer> {
    vec![NetworkPolicyPeer {
        pod_selector: Some(app_selector(pod_label)),
        ..Default::default()
    }]
}

fn mongo_port() -> Vec<NetworkPolicyPort> {
    vec![NetworkPolicyPort {
        port: Some(IntOrString::Int(mongo::PORT)),
        ..Default::default()
    }]
}

/// MongoDB pods accept connections only from frontend pods
pub fn backend_ingress(sb: &SocialBook) -> Result<NetworkPolicy> {
    Ok(NetworkPolicy {
        metadata: object_meta(sb, names::backend_network_policy(sb), true)?,
        spec: Some(NetworkPolicySpec {
            pod_selector: app_selector(names::backend(sb)),
            ingress: Some(vec![NetworkPolicyIngressRule {
                from: Some(peer(names::frontend_pods(sb))),
                ports: Some(mongo_port()),
            }]),
            ..Default::default()
        }),
        ..Default::default()
    })
}

/// Frontend pods may only open connections to MongoDB
pub fn frontend_egress(sb: &SocialBook) -> Result<NetworkPolicy> {
    Ok(NetworkPolicy {
        metadata: object_meta(sb, names::frontend_network_policy(sb), true)?,
        spec: Some(NetworkPolicySpec {
            pod_selector: app_selector(names::frontend_pods(sb)),
            egress: Some(vec![NetworkPolicyEgressRule {
                to: Some(peer(names::backend(sb))),
                ports: Some(mongo_port()),
            }]),
            ..Default::default()
        }),
        ..Default::default()
    })
}
