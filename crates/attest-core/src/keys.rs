//! Object key conventions.
//!
//! Pure string helpers with no AWS SDK dependency, defining the canonical
//! names that generated documents take inside the temporary container.

use jiff::Timestamp;

use crate::error::CoreError;

/// Key for one rendered certificate:
/// `Certificate_of_Insurance_{policy}_{caller}_{yyyyMMdd_HHmmss}.pdf`.
///
/// The UTC second-precision stamp makes keys distinct across requests that
/// differ in policy, caller, or time. Policy numbers arrive unsanitized, so
/// segments that could traverse out of the container prefix are refused
/// rather than escaped.
pub fn certificate_pdf(
    policy_number: &str,
    caller_id: &str,
    at: Timestamp,
) -> Result<String, CoreError> {
    let policy = safe_segment(policy_number)?;
    let caller = safe_segment(caller_id)?;
    let stamp = at.strftime("%Y%m%d_%H%M%S");
    Ok(format!(
        "Certificate_of_Insurance_{policy}_{caller}_{stamp}.pdf"
    ))
}

fn safe_segment(segment: &str) -> Result<&str, CoreError> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains('/')
        || segment.contains('\\')
    {
        return Err(CoreError::UnsafeKeySegment(segment.to_string()));
    }
    Ok(segment)
}
