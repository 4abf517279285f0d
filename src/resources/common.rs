// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Metadata shared by all dependent objects

use crate::constants::{labels, OPERATOR_NAME};
use crate::error::{Result, SocialBookError};
use crate::types::SocialBook;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, OwnerReference};
use kube::api::ObjectMeta;
use kube::{Resource, ResourceExt};
use std::collections::BTreeMap;

/// Controller owner reference pointing at the SocialBook
pub fn owner_reference(sb: &SocialBook) -> Result<OwnerReference> {
    if sb.metadata.uid.is_none() {
        return Err(SocialBookError::MissingObjectKey(".metadata.uid"));
    }
    sb.controller_owner_ref(&())
        .ok_or(SocialBookError::MissingObjectKey(".metadata.name"))
}

pub fn standard_labels(sb: &SocialBook) -> BTreeMap<String, String> {
    BTreeMap::from([
        (labels::MANAGED_BY.to_string(), OPERATOR_NAME.to_string()),
        (
            labels::OWNER_NAMESPACE.to_string(),
            sb.namespace().unwrap_or_default(),
        ),
    ])
}

/// Metadata for a dependent object. Cluster-scoped objects get no namespace.
pub fn object_meta(sb: &SocialBook, name: String, namespaced: bool) -> Result<ObjectMeta> {
    Ok(ObjectMeta {
        name: Some(name),
        namespace: if namespaced { sb.namespace() } else { None },
        labels: Some(standard_labels(sb)),
        owner_references: Some(vec![owner_reference(sb)?]),
        ..Default::default()
    })
}

/// `app=<value>` selector used between deployments, services and network policies
pub fn app_labels(value: String) -> BTreeMap<String, String> {
    BTreeMap::from([(labels::APP.to_string(), value)])
}

pub fn app_selector(value: String) -> LabelSelector {
    LabelSelector {
        match_labels: Some(app_labels(value)),
        ..Default::default()
    }
}

/// True when `obj` has a controller owner reference to `owner`
pub fn is_controlled_by<K: Resource>(obj: &K, owner: &SocialBook) -> bool {
    let Some(owner_uid) = owner.meta().uid.as_deref() else {
        return false;
    };
    obj.owner_references()
        .iter()
        .any(|r| r.controller == Some(true) && r.uid == owner_uid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::tests::make_socialbook;
    use k8s_openapi::api::core::v1::ConfigMap;

    fn make_config_map(owner_references: Option<Vec<OwnerReference>>) -> ConfigMap {
        ConfigMap {
            metadata: ObjectMeta {
                name: Some("app1-cm".to_string()),
                namespace: Some("ns1".to_string()),
                owner_references,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_owner_reference_points_at_socialbook() {
        let sb = make_socialbook("ns1", "app1");
        let oref = owner_reference(&sb).unwrap();

        assert_eq!(oref.kind, "SocialBook");
        assert_eq!(oref.api_version, "ashwin901.operators/v1alpha1");
        assert_eq!(oref.name, "app1");
        assert_eq!(oref.uid, "uid-app1");
        assert_eq!(oref.controller, Some(true));
    }

    #[test]
    fn test_owner_reference_requires_uid() {
        let mut sb = make_socialbook("ns1", "app1");
        sb.metadata.uid = None;

        assert!(matches!(
            owner_reference(&sb),
            Err(SocialBookError::MissingObjectKey(_))
        ));
    }

    #[test]
    fn test_object_meta_cluster_scoped_has_no_namespace() {
        let sb = make_socialbook("ns1", "app1");
        let meta = object_meta(&sb, "app1-pv".to_string(), false).unwrap();

        assert_eq!(meta.namespace, None);
        assert_eq!(
            meta.labels.unwrap().get(labels::OWNER_NAMESPACE).unwrap(),
            "ns1"
        );
    }

    #[test]
    fn test_is_controlled_by_owner() {
        let sb = make_socialbook("ns1", "app1");
        let cm = make_config_map(Some(vec![owner_reference(&sb).unwrap()]));

        assert!(is_controlled_by(&cm, &sb));
    }

    #[test]
    fn test_is_controlled_by_other_owner() {
        let sb = make_socialbook("ns1", "app1");
        let other = make_socialbook("ns1", "app2");
        let cm = make_config_map(Some(vec![owner_reference(&other).unwrap()]));

        assert!(!is_controlled_by(&cm, &sb));
    }

    #[test]
    fn test_is_controlled_by_ignores_non_controller_refs() {
        let sb = make_socialbook("ns1", "app1");
        let mut oref = owner_reference(&sb).unwrap();
        oref.controller = None;
        let cm = make_config_map(Some(vec![oref]));

        assert!(!is_controlled_by(&cm, &sb));
    }

    #[test]
    fn test_is_controlled_by_without_owner() {
        let sb = make_socialbook("ns1", "app1");
        assert!(!is_controlled_by(&make_config_map(None), &sb));
    }
}
