//! The generation pipeline.
//!
//! One invocation runs strictly in sequence: validate, compose, render,
//! resolve the caller, name the artifact, upload, sign. Nothing is shared
//! between invocations; dropping the returned future before the upload
//! completes abandons the request without cleanup.

use std::collections::HashMap;
use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};

use attest_core::keys;
use attest_core::models::artifact::{RenderedArtifact, SignedDocumentLink};
use attest_core::models::certificate::CertificateRequest;
use attest_export::compose;
use attest_export::pdf;
use attest_export::styles::PageGeometry;

use crate::audit::DeliveryEvent;
use crate::config::ServiceConfig;
use crate::error::CertificateError;
use crate::identity::CallerIdentity;
use crate::store::DocumentStore;

/// Metadata key under which the caller identifier travels with every
/// stored object.
pub const CALLER_METADATA_KEY: &str = "caller-id";

pub struct CertificateService {
    identity: Arc<dyn CallerIdentity>,
    store: Arc<dyn DocumentStore>,
    config: ServiceConfig,
}

impl CertificateService {
    pub fn new(
        identity: Arc<dyn CallerIdentity>,
        store: Arc<dyn DocumentStore>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            identity,
            store,
            config,
        }
    }

    /// Generate, store, and sign one certificate.
    pub async fn generate(
        &self,
        request: CertificateRequest,
    ) -> Result<SignedDocumentLink, CertificateError> {
        self.generate_at(request, Timestamp::now()).await
    }

    /// Deterministic pipeline entry point: `now` stamps the generation
    /// date, the storage key, and the link expiry. The clock is read once,
    /// in [`generate`](Self::generate); nothing below this point consults
    /// it again.
    pub async fn generate_at(
        &self,
        request: CertificateRequest,
        now: Timestamp,
    ) -> Result<SignedDocumentLink, CertificateError> {
        request.validate()?;

        tracing::info!(policy_number = %request.policy_number, "generating certificate");

        let generated_on = now.to_zoned(jiff::tz::TimeZone::UTC).date();
        let page = compose::certificate_page(&request, generated_on);
        let artifact = pdf::render(&page, &PageGeometry::default())?;

        tracing::info!(
            policy_number = %request.policy_number,
            size = artifact.size,
            "certificate rendered"
        );

        let caller = self.identity.caller_id()?;
        let key = keys::certificate_pdf(&request.policy_number, caller.as_str(), now)?;
        let metadata =
            HashMap::from([(CALLER_METADATA_KEY.to_string(), caller.to_string())]);

        self.upload_with_retry(&key, &artifact, &metadata).await?;

        let uri = self
            .store
            .signed_url(&self.config.container, &key, self.config.link_ttl)
            .await
            .map_err(CertificateError::Signing)?;

        let expires_at = now
            .saturating_add(SignedDuration::from_secs(self.config.link_ttl.as_secs() as i64))
            .expect("SignedDuration carries no calendar units, so saturating_add cannot fail");

        DeliveryEvent::new(
            caller.as_str(),
            &self.config.container,
            &key,
            artifact.size,
        )
        .emit();

        Ok(SignedDocumentLink { uri, expires_at })
    }

    /// Bounded retry for the upload leg. The artifact has not been exposed
    /// to the caller yet, so retrying is safe; signing is never retried.
    async fn upload_with_retry(
        &self,
        key: &str,
        artifact: &RenderedArtifact,
        metadata: &HashMap<String, String>,
    ) -> Result<(), CertificateError> {
        let attempts = self.config.upload_attempts.max(1);

        for attempt in 0..attempts {
            if attempt > 0 {
                tokio::time::sleep(self.config.retry_backoff).await;
            }

            match self
                .store
                .upload(&self.config.container, key, artifact, metadata)
                .await
            {
                Ok(()) => return Ok(()),
                Err(e) if attempt + 1 < attempts => {
                    tracing::warn!(key, attempt, "upload failed, retrying: {e}");
                }
                Err(e) => {
                    return Err(CertificateError::Store {
                        attempts,
                        source: e,
                    });
                }
            }
        }

        // Unreachable, but satisfy the compiler.
        Err(CertificateError::Store {
            attempts,
            source: attest_storage::error::StorageError::PutObject(
                "upload retry loop exited unexpectedly".to_string(),
            ),
        })
    }
}
