// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CRD availability checking utilities

use crate::constants::crd::{POLL_INTERVAL_SECS, POLL_MAX_INTERVAL_SECS};
use crate::error::Result;
use crate::types::SocialBook;
use kube::{discovery::Discovery, Client, Resource};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Wait for the SocialBook CRD to become available in the cluster.
/// This uses exponential backoff starting at POLL_INTERVAL_SECS seconds.
pub async fn wait_for_socialbook_crd(client: &Client) -> Result<()> {
    let mut interval = POLL_INTERVAL_SECS;
    let api_version = SocialBook::api_version(&());

    loop {
        match check_socialbook_crd_exists(client).await {
            Ok(true) => {
                info!("SocialBook CRD ({}) is available", api_version);
                return Ok(());
            }
            Ok(false) => {
                info!(
                    "SocialBook CRD ({}) not yet available, waiting {} seconds...",
                    api_version, interval
                );
            }
            Err(e) => {
                warn!(
                    "Error checking for SocialBook CRD: {}, retrying in {} seconds...",
                    e, interval
                );
            }
        }

        sleep(Duration::from_secs(interval)).await;

        // Exponential backoff with max cap
        interval = (interval * 2).min(POLL_MAX_INTERVAL_SECS);
    }
}

/// Check if the SocialBook CRD exists by attempting to discover it.
async fn check_socialbook_crd_exists(client: &Client) -> Result<bool> {
    let group = SocialBook::group(&());
    let version = SocialBook::version(&());
    let kind = SocialBook::kind(&());

    let discovery = Discovery::new(client.clone())
        .filter(&[group.as_ref()])
        .run()
        .await?;

    let found = discovery
        .groups()
        .filter(|g| g.name() == group)
        .flat_map(|g| g.recommended_resources())
        .any(|(ar, _)| ar.kind == kind && ar.version == version);
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockService;

    fn api_group_list(groups: serde_json::Value) -> String {
        serde_json::json!({
            "kind": "APIGroupList",
            "apiVersion": "v1",
            "groups": groups
        })
        .to_string()
    }

    fn socialbook_group() -> serde_json::Value {
        let gv = serde_json::json!({
            "groupVersion": "ashwin901.operators/v1alpha1",
            "version": "v1alpha1"
        });
        serde_json::json!({
            "name": "ashwin901.operators",
            "versions": [gv.clone()],
            "preferredVersion": gv
        })
    }

    fn socialbook_resources() -> String {
        serde_json::json!({
            "kind": "APIResourceList",
            "apiVersion": "v1",
            "groupVersion": "ashwin901.operators/v1alpha1",
            "resources": [
                {
                    "name": "socialbooks",
                    "singularName": "socialbook",
                    "namespaced": true,
                    "kind": "SocialBook",
                    "verbs": ["get", "list", "watch", "create", "update", "patch", "delete"]
                },
                {
                    "name": "socialbooks/status",
                    "singularName": "",
                    "namespaced": true,
                    "kind": "SocialBook",
                    "verbs": ["get", "patch", "update"]
                }
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_crd_found_when_group_serves_socialbooks() {
        let client = MockService::new()
            .on_get("/apis", 200, &api_group_list(serde_json::json!([socialbook_group()])))
            .on_get(
                "/apis/ashwin901.operators/v1alpha1",
                200,
                &socialbook_resources(),
            )
            .into_client();

        assert!(check_socialbook_crd_exists(&client).await.unwrap());
    }

    #[tokio::test]
    async fn test_crd_missing_when_group_not_served() {
        let client = MockService::new()
            .on_get("/apis", 200, &api_group_list(serde_json::json!([])))
            .into_client();

        assert!(!check_socialbook_crd_exists(&client).await.unwrap());
    }
}
