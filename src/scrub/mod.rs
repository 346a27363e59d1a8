//! Corrupt-image scrubber: linear scan over a storage prefix, deleting (or
//! in dry-run mode, listing) any object that fails image validation.

pub mod validate;

pub use validate::{validate, ImageDefect, ImageKind};

use crate::aws::ContentStore;
use anyhow::Result;
use tracing::info;

#[derive(Debug, Default)]
pub struct ScrubReport {
    pub scanned: usize,
    pub corrupt: usize,
    pub deleted: usize,
}

/// Scan every image object under the prefix, validating each payload.
/// Corrupt objects are deleted unless dry_run is set. No state is retained
/// between objects.
pub async fn scrub_prefix(
    store: &ContentStore,
    prefix: &str,
    dry_run: bool,
) -> Result<ScrubReport> {
    let mut report = ScrubReport::default();

    for object in store.list_objects(prefix).await? {
        let Some(kind) = ImageKind::from_key(&object.key) else {
            continue;
        };
        report.scanned += 1;

        let data = store.get_object(&object.key).await?;
        let Err(defect) = validate(kind, &data) else {
            continue;
        };

        report.corrupt += 1;
        info!(key = %object.key, %defect, "corrupt image");
        if dry_run {
            println!("[CORRUPT] {}  ({} bytes)", object.key, data.len());
        } else {
            store.delete_object(&object.key).await?;
            println!("[DELETED] {}  ({} bytes)", object.key, data.len());
            report.deleted += 1;
        }
    }

    Ok(report)
}
