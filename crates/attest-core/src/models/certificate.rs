use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Complete policy information required to issue one certificate of
/// insurance.
///
/// The record is flat, matching the upstream action contract: camelCase
/// field names on the wire (`policyNumber`, `carrierEmail`, ...), with the
/// three dates arriving as ISO 8601 civil dates. Malformed dates fail at
/// deserialization; empty fields fail in [`validate`](Self::validate).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    pub policy_number: String,
    pub certificate_number: String,
    pub policy_effective_date: Date,
    pub policy_expiration_date: Date,
    pub issue_date: Date,
    pub carrier_name: String,
    pub carrier_address: String,
    pub carrier_email: String,
    pub producer_name: String,
    pub producer_address: String,
    pub producer_email: String,
    pub insured_company_name: String,
    pub insured_company_address: String,
    pub insured_company_phone: String,
}

impl CertificateRequest {
    /// Check that every field is populated before any layout work begins.
    /// Whitespace-only values count as missing.
    pub fn validate(&self) -> Result<(), CoreError> {
        let fields = [
            ("policyNumber", &self.policy_number),
            ("certificateNumber", &self.certificate_number),
            ("carrierName", &self.carrier_name),
            ("carrierAddress", &self.carrier_address),
            ("carrierEmail", &self.carrier_email),
            ("producerName", &self.producer_name),
            ("producerAddress", &self.producer_address),
            ("producerEmail", &self.producer_email),
            ("insuredCompanyName", &self.insured_company_name),
            ("insuredCompanyAddress", &self.insured_company_address),
            ("insuredCompanyPhone", &self.insured_company_phone),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(CoreError::MissingField(name.to_string()));
            }
        }

        if self.policy_expiration_date < self.policy_effective_date {
            return Err(CoreError::InvalidDateRange {
                effective: self.policy_effective_date,
                expiration: self.policy_expiration_date,
            });
        }

        Ok(())
    }
}
