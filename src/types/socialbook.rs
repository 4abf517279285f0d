// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{Result, SocialBookError};
use crate::resources::names;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Desired state of a two-tier SocialBook application: a MongoDB backend and
/// the social-book server frontend.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[kube(
    group = "ashwin901.operators",
    version = "v1alpha1",
    kind = "SocialBook",
    plural = "socialbooks"
)]
#[kube(namespaced)]
#[kube(status = "SocialBookStatus")]
#[kube(printcolumn = r#"{"name":"MongoDB","type":"string","jsonPath":".status.mongo"}"#)]
#[kube(printcolumn = r#"{"name":"SocialBook","type":"string","jsonPath":".status.socialbook"}"#)]
#[serde(rename_all = "camelCase")]
pub struct SocialBookSpec {
    /// Number of frontend pods
    #[serde(default)]
    #[schemars(range(min = 0))]
    pub replicas: i32,
    #[serde(default)]
    pub mongo_username: String,
    #[serde(default)]
    pub mongo_password: String,
    /// Frontend container port, kept as a string for compatibility with existing manifests
    #[serde(default)]
    pub port: String,
    /// Signing secret for issued tokens
    #[serde(default)]
    pub jwt_secret: String,
    /// Identity used to send verification emails
    #[serde(default, rename = "email")]
    pub email_id: String,
    #[serde(default)]
    pub password: String,
    /// Redirect URL used after email verification
    #[serde(default)]
    pub client_url: String,
    #[serde(default)]
    pub stripe_api_key: String,
}

/// Health of a single subsystem as projected by the reconciler
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
pub enum Phase {
    #[default]
    Pending,
    Success,
    Failed,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
pub struct SocialBookStatus {
    #[serde(rename = "mongo", default)]
    pub mongo_db: Phase,
    #[serde(rename = "socialbook", default)]
    pub social_book: Phase,
}

impl SocialBook {
    /// Parse the configured frontend port, which must be a valid TCP port
    pub fn container_port(&self) -> Result<i32> {
        let port = &self.spec.port;
        match port.trim().parse::<u16>() {
            Ok(p) if p > 0 => Ok(i32::from(p)),
            _ => Err(SocialBookError::InvalidPort(port.clone())),
        }
    }

    /// Connection string handed to the frontend through the config map
    pub fn mongodb_uri(&self) -> String {
        format!(
            "mongodb://{}:{}@{}:27017",
            self.spec.mongo_username,
            self.spec.mongo_password,
            names::backend(self)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::api::ObjectMeta;

    fn make_socialbook(name: &str, spec: SocialBookSpec) -> SocialBook {
        SocialBook {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some("ns1".to_string()),
                ..Default::default()
            },
            spec,
            status: None,
        }
    }

    #[test]
    fn test_mongodb_uri() {
        let sb = make_socialbook(
            "app1",
            SocialBookSpec {
                mongo_username: "u".to_string(),
                mongo_password: "p".to_string(),
                ..Default::default()
            },
        );

        assert_eq!(sb.mongodb_uri(), "mongodb://u:p@app1-mongo:27017");
    }

    #[test]
    fn test_container_port_valid() {
        let sb = make_socialbook(
            "app1",
            SocialBookSpec {
                port: "8080".to_string(),
                ..Default::default()
            },
        );

        assert_eq!(sb.container_port().unwrap(), 8080);
    }

    #[test]
    fn test_container_port_rejects_garbage() {
        for port in ["", "http", "0", "65536", "-1"] {
            let sb = make_socialbook(
                "app1",
                SocialBookSpec {
                    port: port.to_string(),
                    ..Default::default()
                },
            );

            assert!(
                matches!(sb.container_port(), Err(SocialBookError::InvalidPort(_))),
                "port {:?} should be rejected",
                port
            );
        }
    }

    #[test]
    fn test_spec_json_field_names() {
        let spec: SocialBookSpec = serde_json::from_value(serde_json::json!({
            "replicas": 3,
            "mongoUsername": "admin",
            "mongoPassword": "secret",
            "port": "8080",
            "jwtSecret": "jwt",
            "email": "bot@example.com",
            "password": "pwd",
            "clientUrl": "https://example.com",
            "stripeApiKey": "sk_test"
        }))
        .unwrap();

        assert_eq!(spec.replicas, 3);
        assert_eq!(spec.email_id, "bot@example.com");
        assert_eq!(spec.stripe_api_key, "sk_test");
    }

    #[test]
    fn test_status_serializes_as_string_enum() {
        let status = SocialBookStatus {
            mongo_db: Phase::Success,
            social_book: Phase::Failed,
        };

        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            serde_json::json!({"mongo": "Success", "socialbook": "Failed"})
        );
    }
}
