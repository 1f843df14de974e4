use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("S3 PutObject error: {0}")]
    PutObject(String),

    #[error("S3 presign error: {0}")]
    Presign(String),

    #[error("AWS config error: {0}")]
    Config(String),
}
