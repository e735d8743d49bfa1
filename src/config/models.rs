use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use validator::Validate;

use crate::error::{Error, Result};

#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct Config {
    #[validate(length(min = 1, message = "--cf-api-key cannot be empty"))]
    pub cf_api_key: String,

    #[validate(length(min = 1, message = "--cf-api-email cannot be empty"))]
    pub cf_api_email: String,

    #[validate(length(min = 1, message = "--cf-api-zone cannot be empty"))]
    pub cf_api_zone: String,

    #[validate(length(min = 1, message = "--cf-api-domain cannot be empty"))]
    pub cf_api_domain: String,

    #[validate(length(min = 1, message = "--public-ip-filename cannot be empty"))]
    pub public_ip_filename: String,

    pub public_ip_url: String,
    pub cf_api_url: String,
}

// Keeps the API key out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("cf_api_key", &"<REDACTED>")
            .field("cf_api_email", &self.cf_api_email)
            .field("cf_api_zone", &self.cf_api_zone)
            .field("cf_api_domain", &self.cf_api_domain)
            .field("public_ip_filename", &self.public_ip_filename)
            .field("public_ip_url", &self.public_ip_url)
            .field("cf_api_url", &self.cf_api_url)
            .finish()
    }
}

/// Optional YAML settings file. Every key may be omitted.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub cf_api_key: Option<String>,
    pub cf_api_email: Option<String>,
    pub cf_api_zone: Option<String>,
    pub cf_api_domain: Option<String>,
    pub public_ip_filename: Option<String>,
    pub public_ip_url: Option<String>,
    pub cf_api_url: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read config file {}: {}", path.display(), e))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            Error::Config(format!("failed to parse config file {}: {}", path.display(), e))
        })
    }
}
