//! # contract: collaborator interface for the object store
//!
//! The pipeline never talks to a storage SDK directly; everything it needs
//! from the store is expressed by the [`ObjectStore`] trait below. The trait
//! is implemented by the real client in the binary crate and by generated
//! mocks in tests.
//!
//! ## Interface & Extensibility
//! - Implement [`ObjectStore`] to target a new store (S3-compatible, local
//!   fake, test double).
//! - All methods are async and return a boxed error ([`StoreError`]);
//!   implementors convert upstream SDK errors into readable causes.
//! - `set_bucket_policy` exists for the one-shot administrative path only;
//!   the recurring pipeline never calls it.
//!
//! ## Mocking & Testing
//! The trait is annotated for `mockall`, gated on the `test-export-mocks`
//! feature, so consumers can generate deterministic mocks for unit and
//! integration tests.

use async_trait::async_trait;
use std::path::Path;

/// Error type for store operations (boxed, implementor-defined cause).
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Narrow capability set the pipeline requires from an object store.
///
/// The trait is `Send + Sync` and intended for async/await usage; a single
/// instance is constructed per run and shared by reference.
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Whether the named bucket already exists.
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, StoreError>;

    /// Create the named bucket. Implementors treat "already exists" as
    /// success so the precondition check is safe to race.
    async fn create_bucket(&self, bucket: &str) -> Result<(), StoreError>;

    /// Upload the file at `local_path` under `key` in `bucket`.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
    ) -> Result<(), StoreError>;

    /// Replace the bucket's access policy with the given JSON document.
    /// Administrative path only.
    async fn set_bucket_policy(&self, bucket: &str, policy_json: &str)
        -> Result<(), StoreError>;
}
