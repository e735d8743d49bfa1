use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use clouddns_sync::api::CloudflareClient;
use clouddns_sync::cache::IpCache;
use clouddns_sync::config::{Cli, Config};
use clouddns_sync::ddns::{CloudflareDdns, DnsUpdater, Outcome};
use clouddns_sync::ip::{Ipv4Syntax, PublicIpResolver};
use clouddns_sync::Error;
use env_logger::{Env, Target};
use log::{debug, error};

#[tokio::main]
async fn main() -> ExitCode {
    // Progress goes to stdout; RUST_LOG overrides the level
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();

    let config = match Cli::parse().load() {
        Ok(config) => config,
        Err(e) => {
            if matches!(e, Error::MissingParameter(_)) {
                println!("All connection parameters are required:");
                println!("{}", Cli::usage());
            }
            error!("{}", e);
            return exit_code(&e);
        }
    };
    debug!("Loaded {:?}", config);

    match run(config).await {
        Ok(outcome) => {
            debug!("Finished: {:?}", outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            e.downcast_ref::<Error>()
                .map_or(ExitCode::FAILURE, exit_code)
        }
    }
}

fn exit_code(e: &Error) -> ExitCode {
    if e.is_config() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}

async fn run(config: Config) -> Result<Outcome> {
    let http = reqwest::Client::new();

    let resolver = PublicIpResolver::new(http.clone(), &config.public_ip_url, Ipv4Syntax::new()?);
    let cache = IpCache::new(&config.public_ip_filename);
    let client = CloudflareClient::new(
        http,
        &config.cf_api_url,
        &config.cf_api_key,
        &config.cf_api_email,
    );
    let updater = DnsUpdater::new(client, &config.cf_api_zone, &config.cf_api_domain);

    CloudflareDdns::new(resolver, cache, updater)
        .run()
        .await
        .with_context(|| format!("failed to sync {}", config.cf_api_domain))
}
