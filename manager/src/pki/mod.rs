//! Trust material restored onto etcd hosts
//!
//! Generation of certificates happens elsewhere; this module only loads the
//! PEM files the cluster already has and pushes the restore subset to hosts.

mod deploy;

pub use deploy::deploy_restore_certs;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

use crate::constants::pki::{CA_CERT_NAME, KUBE_NODE_CERT_NAME};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificatePki {
    pub name: String,
    pub certificate_pem: String,
    pub key_pem: Option<String>,
}

/// Certificates keyed by name
pub type CertificateBundle = HashMap<String, CertificatePki>;

/// The subset of `bundle` restored onto hosts: the cluster CA and the node
/// identity certificate. Names missing from the bundle are skipped.
///
/// The CA private key never leaves the manager; only its certificate is sent.
pub fn restore_certificates(bundle: &CertificateBundle) -> Vec<CertificatePki> {
    [CA_CERT_NAME, KUBE_NODE_CERT_NAME]
        .iter()
        .filter_map(|name| bundle.get(*name))
        .map(|cert| {
            let mut cert = cert.clone();
            if cert.name == CA_CERT_NAME {
                cert.key_pem = None;
            }
            cert
        })
        .collect()
}

/// Load `<name>.pem` (and `<name>-key.pem` when present) for every certificate
/// in `pki_dir`.
pub async fn load_bundle(pki_dir: &str) -> Result<CertificateBundle> {
    let mut bundle = CertificateBundle::new();
    let mut entries = fs::read_dir(pki_dir)
        .await
        .map_err(|e| anyhow!("Failed to read pki dir {}: {}", pki_dir, e))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if filename.ends_with("-key.pem") {
            continue;
        }
        let Some(name) = filename.strip_suffix(".pem") else {
            continue;
        };

        let certificate_pem = fs::read_to_string(&path)
            .await
            .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;

        let key_path = Path::new(pki_dir).join(format!("{}-key.pem", name));
        let key_pem = fs::read_to_string(&key_path).await.ok();

        debug!("Loaded certificate {} (key: {})", name, key_pem.is_some());
        bundle.insert(
            name.to_string(),
            CertificatePki {
                name: name.to_string(),
                certificate_pem,
                key_pem,
            },
        );
    }

    info!("Loaded {} certificates from {}", bundle.len(), pki_dir);
    Ok(bundle)
}
