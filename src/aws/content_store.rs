//! S3-backed content store for firmware binaries, manifests, training
//! images and model archives.

use super::errors::AwsError;
use aws_config::SdkConfig;
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ObjectSummary {
    pub key: String,
    pub size: i64,
}

/// Thin wrapper over the S3 client, scoped to a single bucket.
pub struct ContentStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl ContentStore {
    pub fn new(config: &SdkConfig, bucket: &str) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(config),
            bucket: bucket.to_string(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Upload a local file under the given key with metadata attached.
    pub async fn upload_file(
        &self,
        key: &str,
        path: &Path,
        content_type: &str,
        metadata: &[(&str, String)],
    ) -> Result<(), AwsError> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| AwsError::api(format!("reading {}", path.display()), e))?;

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(body);
        for (name, value) in metadata {
            request = request.metadata(*name, value.clone());
        }

        request
            .send()
            .await
            .map_err(|e| AwsError::api(format!("uploading s3://{}/{key}", self.bucket), e))?;
        debug!(bucket = %self.bucket, key, "object uploaded");
        Ok(())
    }

    /// Fetch an object, returning None when the key does not exist.
    pub async fn get_object_opt(&self, key: &str) -> Result<Option<Vec<u8>>, AwsError> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        match response {
            Ok(output) => {
                let bytes = output
                    .body
                    .collect()
                    .await
                    .map_err(|e| AwsError::api(format!("reading s3://{}/{key}", self.bucket), e))?;
                Ok(Some(bytes.into_bytes().to_vec()))
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    Ok(None)
                } else {
                    Err(AwsError::api(
                        format!("fetching s3://{}/{key}", self.bucket),
                        service_err,
                    ))
                }
            }
        }
    }

    /// Fetch an object that must exist.
    pub async fn get_object(&self, key: &str) -> Result<Vec<u8>, AwsError> {
        self.get_object_opt(key).await?.ok_or_else(|| AwsError::Api {
            operation: format!("fetching s3://{}/{key}", self.bucket),
            message: "object does not exist".to_string(),
        })
    }

    pub async fn put_bytes(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), AwsError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| AwsError::api(format!("writing s3://{}/{key}", self.bucket), e))?;
        Ok(())
    }

    /// List all objects under a prefix (paginated).
    pub async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectSummary>, AwsError> {
        let mut summaries = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page
                .map_err(|e| AwsError::api(format!("listing s3://{}/{prefix}", self.bucket), e))?;
            for object in page.contents() {
                if let Some(key) = object.key() {
                    summaries.push(ObjectSummary {
                        key: key.to_string(),
                        size: object.size().unwrap_or(0),
                    });
                }
            }
        }
        Ok(summaries)
    }

    /// List the immediate child "directories" under a prefix, returning the
    /// final path component of each (e.g. training job names).
    pub async fn list_child_prefixes(&self, prefix: &str) -> Result<Vec<String>, AwsError> {
        let mut names = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .delimiter("/")
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page
                .map_err(|e| AwsError::api(format!("listing s3://{}/{prefix}", self.bucket), e))?;
            for common in page.common_prefixes() {
                if let Some(p) = common.prefix() {
                    let name = p.trim_end_matches('/').rsplit('/').next().unwrap_or(p);
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }

    pub async fn delete_object(&self, key: &str) -> Result<(), AwsError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AwsError::api(format!("deleting s3://{}/{key}", self.bucket), e))?;
        debug!(bucket = %self.bucket, key, "object deleted");
        Ok(())
    }

    /// Download an object to a local file, creating parent directories.
    pub async fn download_to_file(&self, key: &str, dest: &Path) -> Result<u64, AwsError> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AwsError::api(format!("creating {}", parent.display()), e))?;
        }
        let bytes = self.get_object(key).await?;
        let len = bytes.len() as u64;
        tokio::fs::write(dest, bytes)
            .await
            .map_err(|e| AwsError::api(format!("writing {}", dest.display()), e))?;
        Ok(len)
    }
}
