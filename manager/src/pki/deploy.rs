use anyhow::anyhow;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{info, warn};

use super::{restore_certificates, CertificateBundle};
use crate::constants::limits::WORKER_THREADS;
use crate::errors::{ErrorAggregate, RecoveryError};
use crate::hosts::Host;

/// Install the cluster CA and node certificates on every host.
///
/// A fixed pool of workers drains a shared host queue. Each worker keeps its
/// own error list; the lists are merged once every worker has finished, so a
/// failing host never stops the others from being attempted.
pub async fn deploy_restore_certs(
    hosts: &[Host],
    cluster_certs: &CertificateBundle,
) -> Result<(), RecoveryError> {
    let restore_certs = Arc::new(restore_certificates(cluster_certs));
    info!(
        "[certificates] Deploying {} restore certificates to {} hosts",
        restore_certs.len(),
        hosts.len()
    );

    let (sender, receiver) = mpsc::unbounded_channel::<Host>();
    for host in hosts.iter().cloned() {
        sender.send(host).map_err(|e| {
            RecoveryError::HostOperation(anyhow!(
                "failed to queue host [{}] for certificate deployment",
                e.0.address
            ))
        })?;
    }
    drop(sender);

    let queue = Arc::new(Mutex::new(receiver));
    let mut workers = Vec::with_capacity(WORKER_THREADS);

    for _ in 0..WORKER_THREADS {
        let queue = queue.clone();
        let restore_certs = restore_certs.clone();

        workers.push(tokio::spawn(async move {
            let mut errors = ErrorAggregate::new();
            loop {
                let next = queue.lock().await.recv().await;
                let Some(host) = next else {
                    break;
                };

                if let Err(e) = host.runtime.deploy_certificates(&restore_certs).await {
                    warn!(
                        "[certificates] Failed to deploy certificates on host [{}]: {}",
                        host.address, e
                    );
                    errors.push(anyhow!(
                        "failed to deploy certificates on host [{}]: {}",
                        host.address,
                        e
                    ));
                }
            }
            errors
        }));
    }

    let mut errors = ErrorAggregate::new();
    for result in join_all(workers).await {
        match result {
            Ok(worker_errors) => errors.merge(worker_errors),
            Err(e) => errors.push(anyhow!("certificate worker task failed: {}", e)),
        }
    }

    errors.into_result().map_err(RecoveryError::CertificateDeploy)?;
    info!("[certificates] Restore certificates deployed on all hosts");
    Ok(())
}
