use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{
    client::DnsApiClient,
    models::{ApiResponse, DnsRecord, Zone},
};
use crate::error::{Error, Result};

pub const DEFAULT_API_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Cloudflare v4 client authenticated with a global API key and account email.
pub struct CloudflareClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    api_email: String,
}

#[async_trait]
impl DnsApiClient for CloudflareClient {
    async fn zone_id_by_name(&self, zone: &str) -> Result<String> {
        let request = self
            .client
            .get(format!("{}/zones", self.base_url))
            .query(&[("name", zone)]);

        let zones: Vec<Zone> = self.send(request).await?;
        zones
            .into_iter()
            .find(|z| z.name == zone)
            .map(|z| z.id)
            .ok_or_else(|| Error::Lookup(format!("cannot find zone {}", zone)))
    }

    async fn list_records(&self, zone_id: &str, name: &str) -> Result<Vec<DnsRecord>> {
        let request = self
            .client
            .get(format!("{}/zones/{}/dns_records", self.base_url, zone_id))
            .query(&[("name", name)]);

        self.send(request).await
    }

    async fn update_record(&self, zone_id: &str, record: &DnsRecord) -> Result<DnsRecord> {
        let request = self
            .client
            .patch(format!(
                "{}/zones/{}/dns_records/{}",
                self.base_url, zone_id, record.id
            ))
            .json(&json!({
                "type": record.r#type,
                "name": record.name,
                "content": record.content,
                "ttl": record.ttl,
                "proxied": record.proxied,
            }));

        self.send(request).await
    }
}

impl CloudflareClient {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        api_email: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_email: api_email.into(),
        }
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let value = |v: &str, what: &str| {
            HeaderValue::from_str(v)
                .map_err(|_| Error::Config(format!("{} contains invalid characters", what)))
        };

        let mut headers = HeaderMap::new();
        let mut key = value(&self.api_key, "API key")?;
        key.set_sensitive(true);
        headers.insert("X-Auth-Key", key);
        headers.insert("X-Auth-Email", value(&self.api_email, "API email")?);
        Ok(headers)
    }

    /// Sends the request and unwraps the v4 envelope.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.headers(self.build_headers()?).send().await?;
        let status = response.status();
        let url = response.url().clone();
        let text = response.text().await?;
        debug!("{} {}", status, url);

        let parsed: ApiResponse<T> = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => {
                return Err(Error::Transport(format!(
                    "failed to parse Cloudflare response: {}. Response: {}",
                    e, text
                )));
            }
            Err(_) => {
                return Err(Error::Transport(format!(
                    "Cloudflare request failed with {}: {}",
                    status, text
                )));
            }
        };

        if !status.is_success() || !parsed.success {
            return Err(Error::Transport(format!(
                "Cloudflare request failed with {}: {}",
                status,
                parsed.error_summary()
            )));
        }

        parsed
            .result
            .ok_or_else(|| Error::Transport("Cloudflare response has no result".to_string()))
    }
}
