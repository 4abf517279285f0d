// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Shared configuration for both tiers. Containers read it by key reference at pod start.

use crate::error::Result;
use crate::resources::{names, object_meta};
use crate::types::SocialBook;
use k8s_openapi::api::core::v1::ConfigMap;
use std::collections::BTreeMap;

pub mod keys {
    pub const MONGO_ROOT_USERNAME: &str = "mongo-root-username";
    pub const MONGO_ROOT_PASSWORD: &str = "mongo-root-password";
    pub const PORT: &str = "port";
    pub const SECRET: &str = "secret";
    pub const STRIPE_API_KEY: &str = "stripe-api-key";
    pub const USER_EMAIL: &str = "user-email";
    pub const USER_PASSWORD: &str = "user-pwd";
    pub const CLIENT_URL: &str = "client-url";
    pub const MONGODB_URI: &str = "mongodb-uri";
}

pub fn config_map(sb: &SocialBook) -> Result<ConfigMap> {
    let spec = &sb.spec;
    let data = BTreeMap::from([
        (keys::MONGO_ROOT_USERNAME, spec.mongo_username.clone()),
        (keys::MONGO_ROOT_PASSWORD, spec.mongo_password.clone()),
        (keys::PORT, spec.port.clone()),
        (keys::SECRET, spec.jwt_secret.clone()),
        (keys::STRIPE_API_KEY, spec.stripe_api_key.clone()),
        (keys::USER_EMAIL, spec.email_id.clone()),
        (keys::USER_PASSWORD, spec.password.clone()),
        (keys::CLIENT_URL, spec.client_url.clone()),
        (keys::MONGODB_URI, sb.mongodb_uri()),
    ]);

    Ok(ConfigMap {
        metadata: object_meta(sb, names::config_map(sb), true)?,
        data: Some(
            data.into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        ),
        ..Default::default()
    })
}
