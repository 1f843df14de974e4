use std::collections::HashMap;
use std::time::Duration;

use aws_sdk_s3::Client;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_smithy_types::byte_stream::ByteStream;

use crate::error::StorageError;

/// Put an object to S3 with user metadata. Returns the new ETag.
pub async fn put_object(
    client: &Client,
    bucket: &str,
    key: &str,
    body: Vec<u8>,
    content_type: &str,
    metadata: &HashMap<String, String>,
) -> Result<String, StorageError> {
    let size = body.len();

    let mut req = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .content_type(content_type)
        .body(ByteStream::from(body));

    for (name, value) in metadata {
        req = req.metadata(name, value);
    }

    let resp = req
        .send()
        .await
        .map_err(|e| StorageError::PutObject(e.into_service_error().to_string()))?;

    tracing::debug!(bucket, key, size, "stored object");
    Ok(resp.e_tag().unwrap_or_default().to_string())
}

/// Create a presigned GET URL for `key`.
pub async fn presign_get(
    client: &Client,
    bucket: &str,
    key: &str,
    expires_in: Duration,
) -> Result<String, StorageError> {
    let presign_config = PresigningConfig::builder()
        .expires_in(expires_in)
        .build()
        .map_err(|e| StorageError::Presign(e.to_string()))?;

    let presigned = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .presigned(presign_config)
        .await
        .map_err(|e| StorageError::Presign(e.to_string()))?;

    Ok(presigned.uri().to_string())
}
