// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Idempotent creation of dependent objects with ownership verification

use crate::error::{Result, SocialBookError};
use crate::kubernetes::{ManagedResource, Stores};
use crate::resources::{is_controlled_by, DependentKind, DependentObject};
use crate::types::SocialBook;
use k8s_openapi::api::apps::v1::Deployment;
use kube::api::PostParams;
use kube::{Client, ResourceExt};
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub struct Provisioner {
    client: Client,
    stores: Stores,
}

impl Provisioner {
    pub fn new(client: Client, stores: Stores) -> Self {
        Self { client, stores }
    }

    /// Build the object for `kind` and make sure it exists and is controlled by `owner`
    #[instrument(skip(self, owner), fields(name = %kind.object_name(owner)))]
    pub async fn ensure(&self, owner: &SocialBook, kind: DependentKind) -> Result<()> {
        match kind.build(owner)? {
            DependentObject::ConfigMap(o) => self.ensure_owned(owner, kind, o).await.map(drop),
            DependentObject::PersistentVolume(o) => self.ensure_owned(owner, kind, o).await.map(drop),
            DependentObject::PersistentVolumeClaim(o) => {
                self.ensure_owned(owner, kind, o).await.map(drop)
            }
            DependentObject::Deployment(o) => self.ensure_owned(owner, kind, o).await.map(drop),
            DependentObject::Service(o) => self.ensure_owned(owner, kind, o).await.map(drop),
            DependentObject::NetworkPolicy(o) => self.ensure_owned(owner, kind, o).await.map(drop),
        }
    }

    /// Absent objects are created from `desired`. Present objects are left untouched
    /// but must be controlled by `owner`, otherwise the name is claimed by someone else.
    #[instrument(skip(self, owner, desired), fields(kind = kind.kind(), name = %desired.name_any()))]
    pub async fn ensure_owned<K: ManagedResource>(
        &self,
        owner: &SocialBook,
        kind: DependentKind,
        desired: K,
    ) -> Result<Arc<K>> {
        let namespace = owner.namespace().unwrap_or_default();
        let name = desired.name_any();

        let object = match K::cached(&self.stores, &namespace, &name) {
            Some(existing) => {
                debug!("{} {} already exists", kind.kind(), name);
                existing
            }
            None => {
                info!("Creating {} {}", kind.kind(), name);
                let api = K::api(self.client.clone(), &namespace);
                match api.create(&PostParams::default(), &desired).await {
                    Ok(created) => Arc::new(created),
                    // The cache has not caught up yet; check the live object instead
                    Err(kube::Error::Api(ae)) if ae.code == 409 => {
                        debug!("{} {} exists but is not cached yet", kind.kind(), name);
                        Arc::new(api.get(&name).await?)
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        if !is_controlled_by(object.as_ref(), owner) {
            return Err(SocialBookError::AlreadyExists {
                kind: kind.kind(),
                name,
            });
        }

        Ok(object)
    }

    /// Scale the live frontend deployment to the requested replica count
    #[instrument(skip(self, owner, live, desired), fields(name = %live.name_any()))]
    pub async fn correct_replicas(
        &self,
        owner: &SocialBook,
        live: &Deployment,
        desired: Deployment,
    ) -> Result<()> {
        let wanted = owner.spec.replicas;
        // The API server defaults an unset replica count to 1
        let current = live.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1);

        if current == wanted {
            return Ok(());
        }

        info!("Scaling deployment from {} to {} replicas", current, wanted);

        let mut update = desired;
        update.metadata.resource_version = live.resource_version();

        let api = Deployment::api(self.client.clone(), &owner.namespace().unwrap_or_default());
        api.replace(&live.name_any(), &PostParams::default(), &update)
            .await?;
        Ok(())
    }
}
