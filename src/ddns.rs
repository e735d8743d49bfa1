use log::{info, warn};

use crate::api::{DnsApiClient, DnsRecord};
use crate::cache::IpCache;
use crate::error::{Error, Result};
use crate::ip::PublicIpResolver;

/// How a single run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The cached IP already matched; the provider was not contacted.
    Unchanged,
    /// The record already pointed at the public IP; only the cache was refreshed.
    RecordCurrent,
    /// The record was rewritten and the cache refreshed.
    Updated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSync {
    Current,
    Updated,
}

/// Keeps one existing record in one zone pointed at a given IP.
pub struct DnsUpdater<C> {
    client: C,
    zone: String,
    domain: String,
}

impl<C: DnsApiClient> DnsUpdater<C> {
    pub fn new(client: C, zone: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            client,
            zone: zone.into(),
            domain: domain.into(),
        }
    }

    pub async fn sync(&self, public_ip: &str) -> Result<RecordSync> {
        let zone_id = self.client.zone_id_by_name(&self.zone).await?;
        let records = self.client.list_records(&zone_id, &self.domain).await?;

        let mut record = select_record(records, &self.domain)
            .ok_or_else(|| Error::Lookup(format!("cannot find domain {}", self.domain)))?;

        info!("{}: {}", self.domain, public_ip);

        if record.content == public_ip {
            info!("Record for {} is already up to date", self.domain);
            return Ok(RecordSync::Current);
        }

        info!("Updating IP for {}", self.domain);
        record.content = public_ip.to_string();
        self.client.update_record(&zone_id, &record).await?;
        info!("IP is updated");

        Ok(RecordSync::Updated)
    }
}

/// Picks the record named exactly `domain`. When the provider returns several,
/// the last one in response order is used.
pub fn select_record(records: Vec<DnsRecord>, domain: &str) -> Option<DnsRecord> {
    let mut matches: Vec<DnsRecord> = records.into_iter().filter(|r| r.name == domain).collect();

    if matches.len() > 1 {
        let ids: Vec<&str> = matches.iter().map(|r| r.id.as_str()).collect();
        warn!(
            "{} records named {} ({}); using the last one",
            matches.len(),
            domain,
            ids.join(", ")
        );
    }

    matches.pop()
}

/// One pass of resolve, compare, sync and remember.
pub struct CloudflareDdns<C> {
    resolver: PublicIpResolver,
    cache: IpCache,
    updater: DnsUpdater<C>,
}

impl<C: DnsApiClient> CloudflareDdns<C> {
    pub fn new(resolver: PublicIpResolver, cache: IpCache, updater: DnsUpdater<C>) -> Self {
        Self {
            resolver,
            cache,
            updater,
        }
    }

    pub async fn run(&self) -> Result<Outcome> {
        let public_ip = self.resolver.resolve().await?;
        info!("Public IP is {}", public_ip);

        let current_ip = self.cache.read();
        info!("Current IP is {}", current_ip);

        if public_ip == current_ip {
            return Ok(Outcome::Unchanged);
        }

        let synced = self.updater.sync(&public_ip).await?;

        // Only reached once the provider holds the new IP.
        self.cache.write(&public_ip)?;
        info!("Done");

        Ok(match synced {
            RecordSync::Current => Outcome::RecordCurrent,
            RecordSync::Updated => Outcome::Updated,
        })
    }
}
