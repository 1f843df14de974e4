//! attest-core
//!
//! Pure domain types, request validation, and object key conventions.
//! No AWS SDK dependency; this is the shared vocabulary of the attest system.

pub mod error;
pub mod keys;
pub mod models;
