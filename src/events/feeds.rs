// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Change feeds: one reflector per watched kind, each keeping its cache current and
//! handing every event to the router afterwards.

use crate::config::Config;
use crate::events::EventRouter;
use crate::kubernetes::Writers;
use crate::types::SocialBook;
use futures::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, PersistentVolume, PersistentVolumeClaim, Service};
use k8s_openapi::api::networking::v1::NetworkPolicy;
use k8s_openapi::NamespaceResourceScope;
use kube::runtime::reflector::store::Writer;
use kube::runtime::{reflector, watcher, WatchStreamExt};
use kube::{Api, Client, Resource};
use kube_runtime::watcher::Config as WatcherConfig;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

type Handler<K> = fn(&EventRouter, &watcher::Event<K>);

/// Api scoped to the watched namespace, or the whole cluster
fn scoped<K>(client: Client, namespace: Option<&str>) -> Api<K>
where
    K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>,
{
    match namespace {
        Some(ns) => Api::namespaced(client, ns),
        None => Api::all(client),
    }
}

fn feed<K>(api: Api<K>, writer: Writer<K>, router: Arc<EventRouter>, handle: Handler<K>) -> JoinHandle<()>
where
    K: Resource<DynamicType = ()> + Clone + Debug + DeserializeOwned + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let kind = K::kind(&());
        debug!("Starting {} feed", kind);

        let mut events = reflector(
            writer,
            watcher(api, WatcherConfig::default()).default_backoff(),
        )
        .boxed();

        while let Some(event) = events.next().await {
            match event {
                Ok(event) => handle(&router, &event),
                Err(e) => warn!("{} watch error: {}", kind, e),
            }
        }

        warn!("{} feed ended", kind);
    })
}

/// Start a change feed for SocialBooks and each dependent kind.
/// PersistentVolumes are cluster scoped and always watched cluster wide.
pub fn start_feeds(
    client: Client,
    config: &Config,
    writers: Writers,
    router: Arc<EventRouter>,
) -> Vec<JoinHandle<()>> {
    let ns = config.watch_namespace.as_deref();
    let Writers {
        socialbooks,
        config_maps,
        persistent_volumes,
        persistent_volume_claims,
        deployments,
        services,
        network_policies,
    } = writers;

    vec![
        feed(
            scoped::<SocialBook>(client.clone(), ns),
            socialbooks,
            router.clone(),
            EventRouter::on_primary,
        ),
        feed(
            scoped::<ConfigMap>(client.clone(), ns),
            config_maps,
            router.clone(),
            EventRouter::on_dependent::<ConfigMap>,
        ),
        feed(
            Api::<PersistentVolume>::all(client.clone()),
            persistent_volumes,
            router.clone(),
            EventRouter::on_dependent::<PersistentVolume>,
        ),
        feed(
            scoped::<PersistentVolumeClaim>(client.clone(), ns),
            persistent_volume_claims,
            router.clone(),
            EventRouter::on_dependent::<PersistentVolumeClaim>,
        ),
        feed(
            scoped::<Deployment>(client.clone(), ns),
            deployments,
            router.clone(),
            EventRouter::on_dependent::<Deployment>,
        ),
        feed(
            scoped::<Service>(client.clone(), ns),
            services,
            router.clone(),
            EventRouter::on_dependent::<Service>,
        ),
        feed(
            scoped::<NetworkPolicy>(client, ns),
            network_policies,
            router,
            EventRouter::on_dependent::<NetworkPolicy>,
        ),
    ]
}
