// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use socialbook_operator::config::Config;
use socialbook_operator::events::{start_feeds, EventRouter};
use socialbook_operator::kubernetes::{caches, wait_for_socialbook_crd};
use socialbook_operator::queue::{ExponentialBackoff, WorkQueue};
use socialbook_operator::reconcilers::SocialBookReconciler;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting SocialBook operator");

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: namespace={}, workers={}",
        config.watch_namespace.as_deref().unwrap_or("<all>"),
        config.workers
    );

    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    info!("Waiting for SocialBook CRD to become available...");
    wait_for_socialbook_crd(&client).await?;

    let (stores, writers) = caches();
    let queue = Arc::new(WorkQueue::new(ExponentialBackoff::new(
        config.backoff_base,
        config.backoff_max,
    )));
    let router = Arc::new(EventRouter::new(
        queue.clone(),
        stores.socialbooks.clone(),
    ));

    let feeds = start_feeds(client.clone(), &config, writers, router);

    info!("Waiting for caches to sync...");
    stores.wait_until_ready().await?;
    info!("Caches synced");

    tokio::spawn({
        let queue = queue.clone();
        async move {
            shutdown_signal().await;
            info!("Shutdown requested, draining workers");
            queue.shut_down();
        }
    });

    let reconciler = Arc::new(SocialBookReconciler::new(client, stores, queue));
    reconciler.run(config.workers).await;

    for feed in feeds {
        feed.abort();
    }
    warn!("SocialBook operator stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
