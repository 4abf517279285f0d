// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! SocialBook reconciler - drains the work queue and converges each SocialBook
//! towards its backend and frontend objects.

use crate::error::Result;
use crate::kubernetes::Stores;
use crate::queue::WorkQueue;
use crate::reconcilers::provision::Provisioner;
use crate::resources::{deployment, DependentKind, Tier, BACKEND_PLAN, FRONTEND_PLAN};
use crate::types::{Phase, ReconcileKey, SocialBook, SocialBookStatus};
use k8s_openapi::api::apps::v1::Deployment;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client, ResourceExt};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

pub struct SocialBookReconciler {
    client: Client,
    stores: Stores,
    queue: Arc<WorkQueue<String>>,
    provisioner: Provisioner,
}

impl SocialBookReconciler {
    pub fn new(client: Client, stores: Stores, queue: Arc<WorkQueue<String>>) -> Self {
        let provisioner = Provisioner::new(client.clone(), stores.clone());
        Self {
            client,
            stores,
            queue,
            provisioner,
        }
    }

    /// Run `workers` processing loops until the queue shuts down
    pub async fn run(self: Arc<Self>, workers: usize) {
        info!("Starting {} reconcile worker(s)", workers);

        let handles: Vec<_> = (0..workers)
            .map(|id| {
                let reconciler = Arc::clone(&self);
                tokio::spawn(async move {
                    while reconciler.process_next_item().await {}
                    debug!("Worker {} stopped", id);
                })
            })
            .collect();

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Reconcile worker panicked: {}", e);
            }
        }
    }

    /// Take one key off the queue and reconcile it. Returns false once the queue is shut down.
    pub async fn process_next_item(&self) -> bool {
        let Some(key) = self.queue.get().await else {
            return false;
        };

        match self.reconcile(&key).await {
            Ok(()) => self.queue.forget(&key),
            Err(e) if e.is_retryable() => {
                warn!("Error reconciling {}, requeueing: {}", key, e);
                self.queue.add_rate_limited(key.clone());
            }
            Err(e) => {
                error!("Dropping {}: {}", key, e);
                self.queue.forget(&key);
            }
        }

        self.queue.done(&key);
        true
    }

    /// Converge the SocialBook identified by `key`
    #[instrument(skip(self))]
    pub async fn reconcile(&self, key: &str) -> Result<()> {
        let key: ReconcileKey = key.parse()?;

        let Some(sb) = self.stores.socialbook(&key.namespace, &key.name) else {
            debug!("SocialBook {} no longer exists", key);
            return Ok(());
        };

        let mut status = SocialBookStatus::default();
        let result = self.provision(&sb, &mut status).await;
        self.persist_status(&sb, &status).await;
        result
    }

    /// Backend first, then the frontend once the backend is in place.
    /// `status` reflects every tier that was attempted, even on error.
    async fn provision(&self, sb: &SocialBook, status: &mut SocialBookStatus) -> Result<()> {
        if let Err(e) = self.provision_backend(sb).await {
            status.mongo_db = Phase::Failed;
            return Err(e);
        }
        status.mongo_db = Phase::Success;

        if let Err(e) = self.provision_frontend(sb).await {
            status.social_book = Phase::Failed;
            return Err(e);
        }
        status.social_book = Phase::Success;
        Ok(())
    }

    async fn provision_backend(&self, sb: &SocialBook) -> Result<()> {
        for kind in BACKEND_PLAN {
            self.provisioner.ensure(sb, kind).await?;
        }
        Ok(())
    }

    async fn provision_frontend(&self, sb: &SocialBook) -> Result<()> {
        for kind in FRONTEND_PLAN {
            match kind {
                DependentKind::Deployment(Tier::Frontend) => {
                    let desired = deployment::frontend(sb)?;
                    let live = self
                        .provisioner
                        .ensure_owned::<Deployment>(sb, kind, desired.clone())
                        .await?;
                    self.provisioner
                        .correct_replicas(sb, &live, desired)
                        .await?;
                }
                _ => self.provisioner.ensure(sb, kind).await?,
            }
        }
        Ok(())
    }

    /// Best effort; a failed write is logged and picked up by the next reconciliation
    async fn persist_status(&self, sb: &SocialBook, status: &SocialBookStatus) {
        if sb.status.as_ref() == Some(status) {
            return;
        }

        let name = sb.name_any();
        let api: Api<SocialBook> =
            Api::namespaced(self.client.clone(), &sb.namespace().unwrap_or_default());
        let patch = json!({ "status": status });

        match api
            .patch_status(&name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
        {
            Ok(_) => debug!(
                "Updated status of {}: mongo={:?} socialbook={:?}",
                name, status.mongo_db, status.social_book
            ),
            Err(e) => warn!("Failed to update status of {}: {}", name, e),
        }
    }
}
