use std::time::Duration;

/// Tunables for the generation pipeline. Constructed by the embedding
/// transport; there is no configuration file.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Container (bucket) that receives rendered artifacts.
    pub container: String,

    /// Lifetime of issued signed links.
    pub link_ttl: Duration,

    /// Maximum upload attempts before a storage failure surfaces.
    pub upload_attempts: u32,

    /// Delay between upload attempts.
    pub retry_backoff: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            container: "temporary".to_string(),
            link_ttl: Duration::from_secs(3600),
            upload_attempts: 3,
            retry_backoff: Duration::from_millis(250),
        }
    }
}
