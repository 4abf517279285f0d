// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Naming scheme for dependent objects and pod labels

use crate::constants::suffix;
use crate::types::SocialBook;
use kube::ResourceExt;

pub fn config_map(sb: &SocialBook) -> String {
    format!("{}{}", sb.name_any(), suffix::CONFIG_MAP)
}

pub fn persistent_volume(sb: &SocialBook) -> String {
    format!("{}{}", sb.name_any(), suffix::PERSISTENT_VOLUME)
}

pub fn persistent_volume_claim(sb: &SocialBook) -> String {
    format!("{}{}", sb.name_any(), suffix::PERSISTENT_VOLUME_CLAIM)
}

/// MongoDB deployment and service, and the backend pod label
pub fn backend(sb: &SocialBook) -> String {
    format!("{}{}", sb.name_any(), suffix::MONGO)
}

/// Frontend deployment and service
pub fn frontend(sb: &SocialBook) -> String {
    sb.name_any()
}

/// Frontend pod label
pub fn frontend_pods(sb: &SocialBook) -> String {
    format!("{}{}", sb.name_any(), suffix::SOCIAL_BOOK)
}

pub fn backend_network_policy(sb: &SocialBook) -> String {
    format!("{}{}", backend(sb), suffix::NETWORK_POLICY)
}

pub fn frontend_network_policy(sb: &SocialBook) -> String {
    format!("{}{}", sb.name_any(), suffix::NETWORK_POLICY)
}
