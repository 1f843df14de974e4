use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use jiff::Timestamp;
use jiff::civil::date;

use attest_core::models::artifact::RenderedArtifact;
use attest_core::models::certificate::CertificateRequest;
use attest_service::config::ServiceConfig;
use attest_service::error::{CertificateError, Stage};
use attest_service::generate::{CALLER_METADATA_KEY, CertificateService};
use attest_service::identity::FixedIdentity;
use attest_service::store::DocumentStore;
use attest_storage::error::StorageError;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug)]
struct UploadCall {
    container: String,
    key: String,
    size: u64,
    content_type: String,
    metadata: HashMap<String, String>,
}

#[derive(Debug)]
struct SignCall {
    container: String,
    key: String,
    ttl: Duration,
}

/// In-memory store that records every call and can be told to fail.
#[derive(Default)]
struct RecordingStore {
    uploads: Mutex<Vec<UploadCall>>,
    signs: Mutex<Vec<SignCall>>,
    upload_failures_remaining: AtomicU32,
    fail_signing: bool,
}

impl RecordingStore {
    fn failing_uploads(count: u32) -> Self {
        let store = Self::default();
        store.upload_failures_remaining.store(count, Ordering::SeqCst);
        store
    }

    fn failing_signing() -> Self {
        Self {
            fail_signing: true,
            ..Self::default()
        }
    }

    fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    fn sign_count(&self) -> usize {
        self.signs.lock().unwrap().len()
    }
}

impl DocumentStore for RecordingStore {
    fn upload<'a>(
        &'a self,
        container: &'a str,
        key: &'a str,
        document: &'a RenderedArtifact,
        metadata: &'a HashMap<String, String>,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.uploads.lock().unwrap().push(UploadCall {
                container: container.to_string(),
                key: key.to_string(),
                size: document.size,
                content_type: document.content_type.clone(),
                metadata: metadata.clone(),
            });

            let remaining = self.upload_failures_remaining.load(Ordering::SeqCst);
            if remaining > 0 {
                self.upload_failures_remaining
                    .store(remaining - 1, Ordering::SeqCst);
                return Err(StorageError::PutObject("transient upload error".to_string()));
            }
            Ok(())
        })
    }

    fn signed_url<'a>(
        &'a self,
        container: &'a str,
        key: &'a str,
        ttl: Duration,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(async move {
            self.signs.lock().unwrap().push(SignCall {
                container: container.to_string(),
                key: key.to_string(),
                ttl,
            });

            if self.fail_signing {
                return Err(StorageError::Presign("signing rejected".to_string()));
            }
            Ok(format!("https://store.example/{container}/{key}?sig=abc"))
        })
    }
}

fn sample_request() -> CertificateRequest {
    CertificateRequest {
        policy_number: "POL-001".to_string(),
        certificate_number: "CERT-001".to_string(),
        policy_effective_date: date(2024, 1, 1),
        policy_expiration_date: date(2025, 1, 1),
        issue_date: date(2024, 1, 1),
        carrier_name: "Acme Insurance".to_string(),
        carrier_address: "100 Main St, Springfield, IL".to_string(),
        carrier_email: "contact@acme-insurance.example".to_string(),
        producer_name: "Jordan Reyes".to_string(),
        producer_address: "200 Oak Ave, Springfield, IL".to_string(),
        producer_email: "jordan@producers.example".to_string(),
        insured_company_name: "Widget Works LLC".to_string(),
        insured_company_address: "300 Elm Rd, Springfield, IL".to_string(),
        insured_company_phone: "555-0100".to_string(),
    }
}

fn service(store: Arc<RecordingStore>) -> CertificateService {
    CertificateService::new(
        Arc::new(FixedIdentity::new("u1")),
        store,
        ServiceConfig {
            retry_backoff: Duration::ZERO,
            ..ServiceConfig::default()
        },
    )
}

fn at(instant: &str) -> Timestamp {
    instant.parse().unwrap()
}

#[tokio::test]
async fn generates_a_signed_link_for_a_valid_request() {
    let store = Arc::new(RecordingStore::default());
    let link = service(store.clone())
        .generate_at(sample_request(), at("2024-01-01T10:00:00Z"))
        .await
        .unwrap();

    let uploads = store.uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);

    let upload = &uploads[0];
    assert_eq!(upload.container, "temporary");
    assert_eq!(
        upload.key,
        "Certificate_of_Insurance_POL-001_u1_20240101_100000.pdf"
    );
    assert_eq!(upload.content_type, "application/pdf");
    assert!(upload.size > 0);
    assert_eq!(upload.metadata.get(CALLER_METADATA_KEY).unwrap(), "u1");

    let signs = store.signs.lock().unwrap();
    assert_eq!(signs.len(), 1);
    assert_eq!(signs[0].container, "temporary");
    assert_eq!(signs[0].key, upload.key);
    assert_eq!(signs[0].ttl, Duration::from_secs(3600));

    assert_eq!(
        link.uri,
        format!("https://store.example/temporary/{}?sig=abc", upload.key)
    );
    assert_eq!(link.expires_at, at("2024-01-01T11:00:00Z"));
}

#[tokio::test]
async fn validation_failure_precedes_any_storage_call() {
    let store = Arc::new(RecordingStore::default());
    let mut request = sample_request();
    request.carrier_email = String::new();

    let err = service(store.clone())
        .generate_at(request, at("2024-01-01T10:00:00Z"))
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Stage::Validation);
    assert_eq!(store.upload_count(), 0);
    assert_eq!(store.sign_count(), 0);
}

#[tokio::test]
async fn unsafe_policy_number_never_reaches_the_store() {
    let store = Arc::new(RecordingStore::default());
    let mut request = sample_request();
    request.policy_number = "../escape".to_string();

    let err = service(store.clone())
        .generate_at(request, at("2024-01-01T10:00:00Z"))
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Stage::Validation);
    assert_eq!(store.upload_count(), 0);
}

#[tokio::test]
async fn transient_upload_failure_is_retried() {
    let store = Arc::new(RecordingStore::failing_uploads(1));
    let link = service(store.clone())
        .generate_at(sample_request(), at("2024-01-01T10:00:00Z"))
        .await
        .unwrap();

    assert_eq!(store.upload_count(), 2);
    assert_eq!(store.sign_count(), 1);
    assert!(link.uri.starts_with("https://store.example/temporary/"));
}

#[tokio::test]
async fn persistent_upload_failure_surfaces_after_bounded_attempts() {
    let store = Arc::new(RecordingStore::failing_uploads(u32::MAX));
    let err = service(store.clone())
        .generate_at(sample_request(), at("2024-01-01T10:00:00Z"))
        .await
        .unwrap_err();

    match err {
        CertificateError::Store { attempts, .. } => assert_eq!(attempts, 3),
        other => panic!("expected Store error, got {other:?}"),
    }
    assert_eq!(store.upload_count(), 3);
    assert_eq!(store.sign_count(), 0);
}

#[tokio::test]
async fn signing_failure_is_terminal_and_returns_no_uri() {
    let store = Arc::new(RecordingStore::failing_signing());
    let err = service(store.clone())
        .generate_at(sample_request(), at("2024-01-01T10:00:00Z"))
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Stage::Sign);
    assert!(matches!(err, CertificateError::Signing(_)));

    // The artifact was stored; only the capability is missing.
    assert_eq!(store.upload_count(), 1);
    assert_eq!(store.sign_count(), 1);
}

#[tokio::test]
async fn requests_a_second_apart_get_distinct_keys() {
    let store = Arc::new(RecordingStore::default());
    let service = service(store.clone());

    service
        .generate_at(sample_request(), at("2024-01-01T10:00:00Z"))
        .await
        .unwrap();
    service
        .generate_at(sample_request(), at("2024-01-01T10:00:01Z"))
        .await
        .unwrap();

    let uploads = store.uploads.lock().unwrap();
    assert_eq!(uploads.len(), 2);
    assert_ne!(uploads[0].key, uploads[1].key);
}
