// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Reflector caches for the SocialBook kind and every dependent kind

use crate::types::SocialBook;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, PersistentVolume, PersistentVolumeClaim, Service};
use k8s_openapi::api::networking::v1::NetworkPolicy;
use kube::runtime::reflector::store::{Writer, WriterDropped};
use kube::runtime::reflector::{ObjectRef, Store};
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::sync::Arc;

/// Read side of the caches, shared by the event router and the reconciler
#[derive(Clone)]
pub struct Stores {
    pub socialbooks: Store<SocialBook>,
    pub config_maps: Store<ConfigMap>,
    pub persistent_volumes: Store<PersistentVolume>,
    pub persistent_volume_claims: Store<PersistentVolumeClaim>,
    pub deployments: Store<Deployment>,
    pub services: Store<Service>,
    pub network_policies: Store<NetworkPolicy>,
}

/// Write side of the caches, consumed by the change feeds
pub struct Writers {
    pub socialbooks: Writer<SocialBook>,
    pub config_maps: Writer<ConfigMap>,
    pub persistent_volumes: Writer<PersistentVolume>,
    pub persistent_volume_claims: Writer<PersistentVolumeClaim>,
    pub deployments: Writer<Deployment>,
    pub services: Writer<Service>,
    pub network_policies: Writer<NetworkPolicy>,
}

/// Create empty caches
pub fn caches() -> (Stores, Writers) {
    let writers = Writers {
        socialbooks: Writer::default(),
        config_maps: Writer::default(),
        persistent_volumes: Writer::default(),
        persistent_volume_claims: Writer::default(),
        deployments: Writer::default(),
        services: Writer::default(),
        network_policies: Writer::default(),
    };
    let stores = Stores {
        socialbooks: writers.socialbooks.as_reader(),
        config_maps: writers.config_maps.as_reader(),
        persistent_volumes: writers.persistent_volumes.as_reader(),
        persistent_volume_claims: writers.persistent_volume_claims.as_reader(),
        deployments: writers.deployments.as_reader(),
        services: writers.services.as_reader(),
        network_policies: writers.network_policies.as_reader(),
    };
    (stores, writers)
}

impl Stores {
    pub fn socialbook(&self, namespace: &str, name: &str) -> Option<Arc<SocialBook>> {
        self.socialbooks.get(&ObjectRef::new(name).within(namespace))
    }

    /// Wait until every cache has completed its initial list
    pub async fn wait_until_ready(&self) -> Result<(), WriterDropped> {
        self.socialbooks.wait_until_ready().await?;
        self.config_maps.wait_until_ready().await?;
        self.persistent_volumes.wait_until_ready().await?;
        self.persistent_volume_claims.wait_until_ready().await?;
        self.deployments.wait_until_ready().await?;
        self.services.wait_until_ready().await?;
        self.network_policies.wait_until_ready().await?;
        Ok(())
    }
}

/// A dependent kind with a cache lookup and a typed client
pub trait ManagedResource:
    Resource<DynamicType = ()> + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    fn cached(stores: &Stores, namespace: &str, name: &str) -> Option<Arc<Self>>;

    fn api(client: Client, namespace: &str) -> Api<Self>;
}

impl ManagedResource for ConfigMap {
    fn cached(stores: &Stores, namespace: &str, name: &str) -> Option<Arc<Self>> {
        stores.config_maps.get(&ObjectRef::new(name).within(namespace))
    }

    fn api(client: Client, namespace: &str) -> Api<Self> {
        Api::namespaced(client, namespace)
    }
}

impl ManagedResource for PersistentVolume {
    fn cached(stores: &Stores, _namespace: &str, name: &str) -> Option<Arc<Self>> {
        stores.persistent_volumes.get(&ObjectRef::new(name))
    }

    fn api(client: Client, _namespace: &str) -> Api<Self> {
        Api::all(client)
    }
}

impl ManagedResource for PersistentVolumeClaim {
    fn cached(stores: &Stores, namespace: &str, name: &str) -> Option<Arc<Self>> {
        stores
            .persistent_volume_claims
            .get(&ObjectRef::new(name).within(namespace))
    }

    fn api(client: Client, namespace: &str) -> Api<Self> {
        Api::namespaced(client, namespace)
    }
}

impl ManagedResource for Deployment {
    fn cached(stores: &Stores, namespace: &str, name: &str) -> Option<Arc<Self>> {
        stores.deployments.get(&ObjectRef::new(name).within(namespace))
    }

    fn api(client: Client, namespace: &str) -> Api<Self> {
        Api::namespaced(client, namespace)
    }
}

impl ManagedResource for Service {
    fn cached(stores: &Stores, namespace: &str, name: &str) -> Option<Arc<Self>> {
        stores.services.get(&ObjectRef::new(name).within(namespace))
    }

    fn api(client: Client, namespace: &str) -> Api<Self> {
        Api::namespaced(client, namespace)
    }
}

impl ManagedResource for NetworkPolicy {
    fn cached(stores: &Stores, namespace: &str, name: &str) -> Option<Arc<Self>> {
        stores
            .network_policies
            .get(&ObjectRef::new(name).within(namespace))
    }

    fn api(client: Client, namespace: &str) -> Api<Self> {
        Api::namespaced(client, namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::tests::make_socialbook;
    use kube::api::ObjectMeta;
    use kube::runtime::watcher;

    #[test]
    fn test_cached_lookup_by_namespace_and_name() {
        let (stores, mut writers) = caches();
        let cm = ConfigMap {
            metadata: ObjectMeta {
                name: Some("blog-cm".to_string()),
                namespace: Some("default".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        writers
            .config_maps
            .apply_watcher_event(&watcher::Event::Apply(cm));

        assert!(ConfigMap::cached(&stores, "default", "blog-cm").is_some());
        assert!(ConfigMap::cached(&stores, "other", "blog-cm").is_none());
    }

    #[test]
    fn test_persistent_volume_lookup_ignores_namespace() {
        let (stores, mut writers) = caches();
        let pv = PersistentVolume {
            metadata: ObjectMeta {
                name: Some("blog-pv".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        writers
            .persistent_volumes
            .apply_watcher_event(&watcher::Event::Apply(pv));

        assert!(PersistentVolume::cached(&stores, "default", "blog-pv").is_some());
    }

    #[test]
    fn test_socialbook_lookup() {
        let (stores, mut writers) = caches();
        writers
            .socialbooks
            .apply_watcher_event(&watcher::Event::Apply(make_socialbook("default", "blog")));

        assert!(stores.socialbook("default", "blog").is_some());
        assert!(stores.socialbook("default", "vlog").is_none());
    }
}
