pub mod client;
pub mod cloudflare;
pub mod models;

pub use client::DnsApiClient;
pub use cloudflare::CloudflareClient;
pub use models::DnsRecord;
