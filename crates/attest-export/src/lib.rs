//! attest-export
//!
//! Layout composition and PDF rendering for certificate documents.
//!
//! The two halves are deliberately decoupled: [`compose`] builds a
//! serializable [`layout::Page`] tree from a validated request, and [`pdf`]
//! turns any such tree into bytes. Tests can assert tree shape without
//! decoding PDF output.

pub mod compose;
pub mod error;
pub mod layout;
pub mod pdf;
pub mod styles;
