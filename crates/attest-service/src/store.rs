//! The document store capability and its S3 implementation.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use attest_core::models::artifact::RenderedArtifact;
use attest_storage::error::StorageError;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Write-and-sign capability over object containers.
///
/// Methods return boxed futures for dyn compatibility. The two operations
/// are sequential and not transactional: a stored object whose signing
/// fails stays stored.
pub trait DocumentStore: Send + Sync {
    /// Upload the rendered document under `key`, attaching user metadata.
    fn upload<'a>(
        &'a self,
        container: &'a str,
        key: &'a str,
        document: &'a RenderedArtifact,
        metadata: &'a HashMap<String, String>,
    ) -> BoxFuture<'a, Result<(), StorageError>>;

    /// Produce a read-only URL for `key` that expires after `ttl`.
    fn signed_url<'a>(
        &'a self,
        container: &'a str,
        key: &'a str,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<String, StorageError>>;
}

/// S3-backed document store.
pub struct S3DocumentStore {
    client: aws_sdk_s3::Client,
}

impl S3DocumentStore {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

impl DocumentStore for S3DocumentStore {
    fn upload<'a>(
        &'a self,
        container: &'a str,
        key: &'a str,
        document: &'a RenderedArtifact,
        metadata: &'a HashMap<String, String>,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            attest_storage::objects::put_object(
                &self.client,
                container,
                key,
                document.bytes.clone(),
                &document.content_type,
                metadata,
            )
            .await?;
            Ok(())
        })
    }

    fn signed_url<'a>(
        &'a self,
        container: &'a str,
        key: &'a str,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(attest_storage::objects::presign_get(
            &self.client,
            container,
            key,
            ttl,
        ))
    }
}
