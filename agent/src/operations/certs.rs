// File: agent/src/operations/certs.rs
use anyhow::{anyhow, Result};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::types::Certificate;

/// Write each certificate to `<ssl_dir>/<name>.pem` and its key, when
/// present, to `<ssl_dir>/<name>-key.pem` with owner-only permissions.
pub async fn deploy_certificates(ssl_dir: &Path, certificates: &[Certificate]) -> Result<()> {
    fs::create_dir_all(ssl_dir)
        .await
        .map_err(|e| anyhow!("Failed to create {}: {}", ssl_dir.display(), e))?;

    for certificate in certificates {
        if certificate.name.is_empty() || certificate.name.contains('/') {
            return Err(anyhow!("Invalid certificate name: '{}'", certificate.name));
        }

        let cert_path = ssl_dir.join(format!("{}.pem", certificate.name));
        fs::write(&cert_path, &certificate.certificate_pem)
            .await
            .map_err(|e| anyhow!("Failed to write {}: {}", cert_path.display(), e))?;

        if let Some(key_pem) = &certificate.key_pem {
            let key_path = ssl_dir.join(format!("{}-key.pem", certificate.name));
            fs::write(&key_path, key_pem)
                .await
                .map_err(|e| anyhow!("Failed to write {}: {}", key_path.display(), e))?;
            fs::set_permissions(&key_path, std::fs::Permissions::from_mode(0o600)).await?;
        }

        info!("✓ Certificate {} deployed", certificate.name);
    }
    Ok(())
}
