// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Maps change notifications onto work queue keys.
//!
//! SocialBook changes enqueue the SocialBook itself, but only when its resource version
//! moved. Changes to a dependent object enqueue the SocialBook that controls it.

use crate::constants::labels;
use crate::queue::WorkQueue;
use crate::types::{ReconcileKey, SocialBook};
use kube::runtime::reflector::{ObjectRef, Store};
use kube::runtime::watcher;
use kube::{Resource, ResourceExt};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

pub struct EventRouter {
    queue: Arc<WorkQueue<String>>,
    socialbooks: Store<SocialBook>,
    /// Last resource version enqueued per SocialBook key
    observed: Mutex<HashMap<String, String>>,
}

impl EventRouter {
    pub fn new(queue: Arc<WorkQueue<String>>, socialbooks: Store<SocialBook>) -> Self {
        Self {
            queue,
            socialbooks,
            observed: Mutex::new(HashMap::new()),
        }
    }

    fn observed(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.observed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn on_primary(&self, event: &watcher::Event<SocialBook>) {
        match event {
            watcher::Event::Apply(sb) | watcher::Event::InitApply(sb) => self.enqueue_if_changed(sb),
            watcher::Event::Delete(sb) => {
                // Dependents are garbage collected through their owner references
                let key = ReconcileKey::from_resource(sb).to_string();
                debug!("SocialBook {} deleted", key);
                self.observed().remove(&key);
            }
            // SocialBooks deleted while the watch was down never get a Delete event
            watcher::Event::InitDone => self.prune_observed(),
            watcher::Event::Init => {}
        }
    }

    pub fn on_dependent<K: Resource>(&self, event: &watcher::Event<K>) {
        match event {
            watcher::Event::Apply(obj)
            | watcher::Event::InitApply(obj)
            | watcher::Event::Delete(obj) => {
                if let Some(key) = self.owner_key(obj) {
                    trace!("{} changed, enqueueing owner {}", obj.name_any(), key);
                    self.queue.add(key);
                }
            }
            watcher::Event::Init | watcher::Event::InitDone => {}
        }
    }

    /// Keep observed versions only for SocialBooks still in the cache
    fn prune_observed(&self) {
        let live: HashSet<String> = self
            .socialbooks
            .state()
            .iter()
            .map(|sb| ReconcileKey::from_resource(sb.as_ref()).to_string())
            .collect();
        self.observed().retain(|key, _| live.contains(key));
    }

    fn enqueue_if_changed(&self, sb: &SocialBook) {
        let key = ReconcileKey::from_resource(sb).to_string();
        let version = sb.resource_version();

        if let Some(version) = version {
            let mut observed = self.observed();
            if observed.get(&key) == Some(&version) {
                trace!("SocialBook {} unchanged at {}", key, version);
                return;
            }
            observed.insert(key.clone(), version);
        }

        debug!("Enqueueing SocialBook {}", key);
        self.queue.add(key);
    }

    /// Key of the cached SocialBook controlling `obj`, if any
    fn owner_key<K: Resource>(&self, obj: &K) -> Option<String> {
        let owner = obj
            .owner_references()
            .iter()
            .find(|r| r.controller == Some(true))?;

        if owner.kind != SocialBook::kind(&()) || owner.api_version != SocialBook::api_version(&()) {
            return None;
        }

        // Cluster-scoped dependents carry their owner's namespace as a label
        let namespace = obj
            .namespace()
            .or_else(|| obj.labels().get(labels::OWNER_NAMESPACE).cloned())?;

        let cached = self
            .socialbooks
            .get(&ObjectRef::new(&owner.name).within(&namespace))
            .filter(|sb| sb.uid().as_deref() == Some(owner.uid.as_str()));
        let Some(sb) = cached else {
            debug!(
                "Owner {}/{} of {} not found, ignoring",
                namespace,
                owner.name,
                obj.name_any()
            );
            return None;
        };

        Some(ReconcileKey::from_resource(sb.as_ref()).to_string())
    }
}
