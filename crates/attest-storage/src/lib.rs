//! attest-storage
//!
//! Thin S3 wrapper: client construction, uploads, and presigned URLs.

pub mod client;
pub mod error;
pub mod objects;
