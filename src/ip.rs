//! Public IPv4 discovery.

use log::debug;
use regex::Regex;

use crate::error::{Error, Result};

pub const DEFAULT_PUBLIC_IP_URL: &str = "https://api.ipify.org";

// Purely syntactic: octet values up to 999 pass.
const IPV4_PATTERN: &str = r"^([0-9]{1,3}\.){3}[0-9]{1,3}$";

/// Dotted-quad syntax check, compiled once and shared by whoever needs it.
#[derive(Debug, Clone)]
pub struct Ipv4Syntax {
    pattern: Regex,
}

impl Ipv4Syntax {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(IPV4_PATTERN)
            .map_err(|e| Error::Validation(format!("invalid IPv4 pattern: {}", e)))?;
        Ok(Self { pattern })
    }

    pub fn is_ipv4(&self, ip: &str) -> bool {
        if ip.is_empty() {
            return false;
        }
        self.pattern.is_match(ip)
    }
}

/// Asks an IP-echo service for the caller's address.
pub struct PublicIpResolver {
    client: reqwest::Client,
    url: String,
    syntax: Ipv4Syntax,
}

impl PublicIpResolver {
    pub fn new(client: reqwest::Client, url: impl Into<String>, syntax: Ipv4Syntax) -> Self {
        Self {
            client,
            url: url.into(),
            syntax,
        }
    }

    /// Returns the response body untouched once it passes the syntax check.
    pub async fn resolve(&self) -> Result<String> {
        debug!("Fetching public IP from {}", self.url);

        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        // Raw bytes: no BOM stripping or lossy decoding before the check.
        let body = String::from_utf8(body.to_vec()).map_err(|e| {
            Error::Validation(format!("cannot get IPv4 from {}: {}", self.url, e))
        })?;

        if !self.syntax.is_ipv4(&body) {
            return Err(Error::Validation(format!(
                "cannot get IPv4 from {}: got {:?}",
                self.url, body
            )));
        }

        Ok(body)
    }
}
