use serde::Serialize;
use tracing::info;

/// A structured record of one delivered artifact.
///
/// Emitted via `tracing` so the hosting runtime's log pipeline can attribute
/// stored artifacts to a caller without decoding object names. The same
/// identifier also travels in the stored object's metadata.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryEvent {
    pub caller_id: String,
    pub container: String,
    pub key: String,
    pub size: u64,
    pub details: Option<serde_json::Value>,
}

impl DeliveryEvent {
    pub fn new(
        caller_id: impl Into<String>,
        container: impl Into<String>,
        key: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            caller_id: caller_id.into(),
            container: container.into(),
            key: key.into(),
            size,
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Emit this event via tracing.
    pub fn emit(&self) {
        info!(
            delivery.caller_id = %self.caller_id,
            delivery.container = %self.container,
            delivery.key = %self.key,
            delivery.size = self.size,
            "certificate delivered"
        );
    }
}
