//! Trained-model artifact fetch.
//!
//! Training jobs land their output at
//! `training-output/{job}/output/model.tar.gz`; job names embed a timestamp
//! so lexicographic order is chronological. No inference happens here, this
//! is purely the download-and-cache glue.

use crate::aws::ContentStore;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Local cache directory for downloaded model archives.
pub fn cache_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".cache").join("bootboots").join("model")
}

/// Object key for a training job's model archive.
pub fn model_key(training_output_prefix: &str, job: &str) -> String {
    format!("{training_output_prefix}/{job}/output/model.tar.gz")
}

/// Pick the most recent job from a list of job names.
pub fn latest_job(mut jobs: Vec<String>) -> Option<String> {
    jobs.sort();
    jobs.pop()
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub job: String,
    pub path: PathBuf,
    /// False when the cached copy was used.
    pub downloaded: bool,
    pub bytes: u64,
}

/// Resolve the most recently completed training job on the store.
pub async fn find_latest_job(store: &ContentStore, prefix: &str) -> Result<String> {
    let jobs = store.list_child_prefixes(&format!("{prefix}/")).await?;
    latest_job(jobs).with_context(|| {
        format!(
            "No training jobs found in s3://{}/{prefix}/",
            store.bucket()
        )
    })
}

/// Download a job's model archive into the local cache, reusing a cached
/// copy unless refresh is set.
pub async fn fetch_model(
    store: &ContentStore,
    training_output_prefix: &str,
    job: &str,
    refresh: bool,
) -> Result<FetchOutcome> {
    let dest = cache_dir().join(job).join("model.tar.gz");

    if !refresh {
        if let Ok(metadata) = std::fs::metadata(&dest) {
            return Ok(FetchOutcome {
                job: job.to_string(),
                path: dest,
                downloaded: false,
                bytes: metadata.len(),
            });
        }
    }

    let key = model_key(training_output_prefix, job);
    let bytes = store.download_to_file(&key, &dest).await?;
    Ok(FetchOutcome {
        job: job.to_string(),
        path: dest,
        downloaded: true,
        bytes,
    })
}
