//! S3-compatible object store client.
//!
//! Implements the core's [`ObjectStore`] contract over `aws-sdk-s3` against
//! a MinIO (or any S3-compatible) endpoint: path-style addressing, static
//! credentials from the run configuration, and the SDK's standard retry mode
//! with a bounded attempt budget so transient 5xx errors are retried with
//! backoff at the transport layer. After the budget is exhausted the
//! operation fails and surfaces to the caller as a per-operation error.
//!
//! Each request emits a structured `debug!` event; that is the transport
//! observability hook, independent of the pipeline logic.

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::Path;
use tracing::{debug, info};

use bucket_sync_core::config::StorageConfig;
use bucket_sync_core::contract::{ObjectStore, StoreError};

/// Bounded transport retry budget for transient server errors.
const MAX_ATTEMPTS: u32 = 5;

/// S3-compatible client bound to one endpoint and credential pair.
///
/// Constructed once per run and passed by reference to every component that
/// needs it; never mutated after construction.
pub struct MinioStore {
    client: Client,
}

impl MinioStore {
    /// Build a client for the configured endpoint.
    ///
    /// The endpoint URL scheme follows the `secure` flag; the region is a
    /// fixed placeholder, which S3-compatible stores ignore but the SDK
    /// requires for signing.
    pub async fn connect(storage: &StorageConfig) -> anyhow::Result<Self> {
        let scheme = if storage.secure { "https" } else { "http" };
        let endpoint_url = format!("{scheme}://{}", storage.endpoint);

        let credentials = aws_sdk_s3::config::Credentials::new(
            &storage.access_key,
            &storage.secret_key,
            None, // session_token
            None, // expiry
            "bucket-sync-config",
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .endpoint_url(&endpoint_url)
            .credentials_provider(credentials)
            .retry_config(RetryConfig::standard().with_max_attempts(MAX_ATTEMPTS))
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        info!(endpoint = %endpoint_url, "Object store client initialised");
        Ok(Self {
            client: Client::from_conf(s3_config),
        })
    }

    /// Map an AWS SDK error to a store error with context.
    fn map_sdk_error(context: &str, err: impl std::fmt::Display) -> StoreError {
        format!("s3 {context}: {err}").into()
    }
}

#[async_trait]
impl ObjectStore for MinioStore {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StoreError> {
        debug!(bucket, "head_bucket");
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(Self::map_sdk_error("head_bucket", service_err))
                }
            }
        }
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), StoreError> {
        debug!(bucket, "create_bucket");
        match self.client.create_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(()),
            Err(err) => {
                let service_err = err.into_service_error();
                // Losing the existence race to another run is fine.
                if service_err.is_bucket_already_owned_by_you()
                    || service_err.is_bucket_already_exists()
                {
                    Ok(())
                } else {
                    Err(Self::map_sdk_error("create_bucket", service_err))
                }
            }
        }
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
    ) -> Result<(), StoreError> {
        debug!(bucket, key, file = %local_path.display(), "put_object");
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| Self::map_sdk_error("read local file for put_object", e))?;
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| Self::map_sdk_error("put_object", e))?;
        Ok(())
    }

    async fn set_bucket_policy(
        &self,
        bucket: &str,
        policy_json: &str,
    ) -> Result<(), StoreError> {
        debug!(bucket, "put_bucket_policy");
        self.client
            .put_bucket_policy()
            .bucket(bucket)
            .policy(policy_json)
            .send()
            .await
            .map_err(|e| Self::map_sdk_error("put_bucket_policy", e))?;
        Ok(())
    }
}
