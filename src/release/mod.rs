//! Firmware release flow: version bump, build, upload, manifest update.

pub mod build;
pub mod manifest;
pub mod version;

pub use build::{find_project_root, BuildError, FirmwareBuilder};
pub use manifest::{Manifest, ManifestEntry};
pub use version::{BumpType, Version, VersionFile};

use crate::aws::{AwsError, ContentStore};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Object key for a published firmware binary.
pub fn firmware_key(project: &str, version: Version) -> String {
    format!("{project}/{version}/firmware.bin")
}

/// Object key for the release manifest.
pub fn manifest_key(project: &str) -> String {
    format!("{project}/manifest.json")
}

/// Upload a built firmware binary to the content store. Returns the object
/// key. No retry: upload failure aborts the release.
pub async fn publish_firmware(
    store: &ContentStore,
    project: &str,
    version: Version,
    artifact: &Path,
) -> Result<String, AwsError> {
    let size = std::fs::metadata(artifact)
        .map(|m| m.len())
        .unwrap_or_default();
    let key = firmware_key(project, version);
    let metadata = [
        ("project", project.to_string()),
        ("version", version.to_string()),
        ("size", size.to_string()),
        ("build-timestamp", chrono::Utc::now().to_rfc3339()),
    ];
    store
        .upload_file(&key, artifact, "application/octet-stream", &metadata)
        .await?;
    info!(key, size, "firmware uploaded");
    Ok(key)
}

/// Read-modify-write of the release manifest. There is no locking:
/// concurrent releases are last-write-wins.
pub async fn update_manifest(
    store: &ContentStore,
    project: &str,
    version: Version,
) -> Result<Manifest> {
    let key = manifest_key(project);
    let mut manifest = match store.get_object_opt(&key).await? {
        Some(bytes) => serde_json::from_slice(&bytes)
            .with_context(|| format!("Manifest at {key} is not valid JSON"))?,
        None => Manifest::new(project),
    };

    manifest.upsert(version, &firmware_key(project, version));

    let body = serde_json::to_vec_pretty(&manifest).context("Failed to serialize manifest")?;
    store.put_bytes(&key, body, "application/json").await?;
    info!(key, version = %version, "manifest updated");
    Ok(manifest)
}
