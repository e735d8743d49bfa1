use super::models::DnsRecord;
use crate::error::Result;
use async_trait::async_trait;

/// What the updater needs from a DNS provider.
#[async_trait]
pub trait DnsApiClient: Send + Sync {
    /// Resolves a zone name such as `example.com` to the provider's zone id.
    async fn zone_id_by_name(&self, zone: &str) -> Result<String>;

    /// Lists the records in a zone, filtered server-side by exact name.
    async fn list_records(&self, zone_id: &str, name: &str) -> Result<Vec<DnsRecord>>;

    /// Writes `record` back, keyed by its id. Returns the provider's copy.
    async fn update_record(&self, zone_id: &str, record: &DnsRecord) -> Result<DnsRecord>;
}
