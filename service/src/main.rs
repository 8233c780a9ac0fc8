use crate::client::dog_api_client::DogApiClient;
use crate::config::Config;
use crate::observability::telemetry_setup;
use crate::repository::bucket_repository::BucketRepository;
use crate::router::Handler;
use anyhow::Context;
use aws_config::BehaviorVersion;
use lambda_runtime::service_fn;
use tracing::{error, info};

mod client;
mod config;
mod domain;
mod observability;
mod repository;
mod response_handler;
mod router;
mod service;
#[cfg(test)]
mod test_support;

const SERVICE_NAME: &str = "dog-fetcher";

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    let telemetry = telemetry_setup(SERVICE_NAME)?;

    let handler = match startup().await {
        Ok((config, source, store)) => Handler::new(config, source, store, Some(telemetry)),
        Err(e) => {
            error!("Cold start failed: {e:#}");
            return Err(e.into());
        }
    };

    info!("Waiting for invocations");
    lambda_runtime::run(service_fn(|event| handler.handle(event))).await
}

/// Configuration is checked before any client is built so a missing bucket
/// fails the cold start without touching the network.
async fn startup() -> anyhow::Result<(Config, DogApiClient, BucketRepository)> {
    let config = Config::from_env().context("reading configuration")?;

    let source = DogApiClient::new(&config).context("building dog API client")?;

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let store = BucketRepository::new(aws_sdk_s3::Client::new(&aws_config));
    info!("Storing dogs in bucket {}", config.bucket_name);

    Ok((config, source, store))
}
