use thiserror::Error;

use attest_core::error::CoreError;
use attest_export::error::ExportError;
use attest_storage::error::StorageError;

/// Pipeline stage at which a generation attempt stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validation,
    Render,
    Identity,
    Store,
    Sign,
}

/// Raised when the caller identifier cannot be resolved.
#[derive(Debug, Error)]
#[error("caller identity unavailable: {0}")]
pub struct IdentityError(pub String);

#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("validation failed: {0}")]
    Validation(#[from] CoreError),

    #[error("rendering failed: {0}")]
    Render(#[from] ExportError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("upload failed after {attempts} attempts: {source}")]
    Store {
        attempts: u32,
        #[source]
        source: StorageError,
    },

    #[error("signed link generation failed: {0}")]
    Signing(#[source] StorageError),
}

impl CertificateError {
    /// The stage at which the pipeline stopped. Key-safety rejections from
    /// the artifact namer count as validation: they fault the input, not
    /// the store.
    pub fn stage(&self) -> Stage {
        match self {
            CertificateError::Validation(_) => Stage::Validation,
            CertificateError::Render(_) => Stage::Render,
            CertificateError::Identity(_) => Stage::Identity,
            CertificateError::Store { .. } => Stage::Store,
            CertificateError::Signing(_) => Stage::Sign,
        }
    }
}
