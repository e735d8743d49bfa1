//! Configuration loading.
//!
//! Values come from command-line flags (or their environment variables) and fall
//! back to an optional YAML file. All five connection values must end up non-empty.

pub mod models;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use validator::Validate;

use crate::api::cloudflare::DEFAULT_API_BASE_URL;
use crate::error::{Error, Result};
use crate::ip::DEFAULT_PUBLIC_IP_URL;

pub use models::{Config, FileConfig};

#[derive(Debug, Parser)]
#[command(
    name = "clouddns-sync",
    version,
    about = "Points a Cloudflare DNS record at this machine's public IPv4 address"
)]
pub struct Cli {
    /// Cloudflare API key
    #[arg(long = "cf-api-key", env = "CF_API_KEY", hide_env_values = true)]
    pub cf_api_key: Option<String>,

    /// Cloudflare account email
    #[arg(long = "cf-api-email", env = "CF_API_EMAIL")]
    pub cf_api_email: Option<String>,

    /// Zone name, e.g. example.com
    #[arg(long = "cf-api-zone", env = "CF_API_ZONE")]
    pub cf_api_zone: Option<String>,

    /// Record name to keep current, e.g. home.example.com
    #[arg(long = "cf-api-domain", env = "CF_API_DOMAIN")]
    pub cf_api_domain: Option<String>,

    /// File holding the last public IP pushed to DNS
    #[arg(long = "public-ip-filename", env = "PUBLIC_IP_FILENAME")]
    pub public_ip_filename: Option<String>,

    /// Service that answers with the caller's public IP as plain text
    #[arg(long = "public-ip-url", env = "PUBLIC_IP_URL")]
    pub public_ip_url: Option<String>,

    #[arg(long = "cf-api-url", env = "CF_API_URL", hide = true)]
    pub cf_api_url: Option<String>,

    /// YAML file with fallback values for any of the options above
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn usage() -> String {
        Cli::command().render_help().to_string()
    }

    /// Merges flags over the config file and checks that nothing required is empty.
    pub fn load(self) -> Result<Config> {
        let file = match &self.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let config = Config {
            cf_api_key: self.cf_api_key.or(file.cf_api_key).unwrap_or_default(),
            cf_api_email: self.cf_api_email.or(file.cf_api_email).unwrap_or_default(),
            cf_api_zone: self.cf_api_zone.or(file.cf_api_zone).unwrap_or_default(),
            cf_api_domain: self.cf_api_domain.or(file.cf_api_domain).unwrap_or_default(),
            public_ip_filename: self
                .public_ip_filename
                .or(file.public_ip_filename)
                .unwrap_or_default(),
            public_ip_url: self
                .public_ip_url
                .or(file.public_ip_url)
                .unwrap_or_else(|| DEFAULT_PUBLIC_IP_URL.to_string()),
            cf_api_url: self
                .cf_api_url
                .or(file.cf_api_url)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        };

        config
            .validate()
            .map_err(|e| Error::MissingParameter(e.to_string()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["clouddns-sync"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    const FULL: &[&str] = &[
        "--cf-api-key",
        "key",
        "--cf-api-email",
        "me@example.com",
        "--cf-api-zone",
        "example.com",
        "--cf-api-domain",
        "home.example.com",
        "--public-ip-filename",
        "/tmp/ip",
    ];

    #[test]
    fn test_all_flags_present() {
        let config = parse(FULL).load().unwrap();
        assert_eq!(config.cf_api_key, "key");
        assert_eq!(config.cf_api_email, "me@example.com");
        assert_eq!(config.cf_api_zone, "example.com");
        assert_eq!(config.cf_api_domain, "home.example.com");
        assert_eq!(config.public_ip_filename, "/tmp/ip");
        assert_eq!(config.public_ip_url, DEFAULT_PUBLIC_IP_URL);
        assert_eq!(config.cf_api_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_missing_flag_is_missing_parameter() {
        let err = parse(&FULL[..8]).load().unwrap_err();
        assert!(matches!(err, Error::MissingParameter(_)));
        assert!(err.to_string().contains("--public-ip-filename"));
    }

    #[test]
    fn test_empty_flag_is_missing_parameter() {
        let mut args = FULL.to_vec();
        args[1] = "";
        let err = parse(&args).load().unwrap_err();
        assert!(matches!(err, Error::MissingParameter(_)));
        assert!(err.to_string().contains("--cf-api-key"));
    }

    #[test]
    fn test_config_file_fills_gaps_and_flags_win() {
        let file = NamedTempFile::new().unwrap();
        fs::write(
            &file,
            r#"
            cf_api_key: "file_key"
            cf_api_email: "file@example.com"
            cf_api_zone: "example.com"
            cf_api_domain: "home.example.com"
            public_ip_filename: "/var/tmp/ip"
            public_ip_url: "http://127.0.0.1:9/ip"
            "#,
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let config = parse(&["--config", path, "--cf-api-key", "flag_key"])
            .load()
            .unwrap();

        assert_eq!(config.cf_api_key, "flag_key");
        assert_eq!(config.cf_api_email, "file@example.com");
        assert_eq!(config.public_ip_filename, "/var/tmp/ip");
        assert_eq!(config.public_ip_url, "http://127.0.0.1:9/ip");
    }

    #[test]
    fn test_unparsable_config_file_is_config_error() {
        let file = NamedTempFile::new().unwrap();
        fs::write(&file, "update_interval: 300\n").unwrap();

        let path = file.path().to_str().unwrap();
        let err = parse(&["--config", path]).load().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_config_file() {
        let err = parse(&["--config", "/nonexistent/clouddns.yaml"])
            .load()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = parse(FULL).load().unwrap();
        let shown = format!("{:?}", config);
        assert!(!shown.contains("\"key\""));
        assert!(shown.contains("<REDACTED>"));
    }

    #[test]
    fn test_usage_lists_required_flags() {
        let usage = Cli::usage();
        for flag in [
            "--cf-api-key",
            "--cf-api-email",
            "--cf-api-zone",
            "--cf-api-domain",
            "--public-ip-filename",
        ] {
            assert!(usage.contains(flag), "usage is missing {}", flag);
        }
    }
}
