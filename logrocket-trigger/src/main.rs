//! HTTP service receiving LogRocket alert webhooks and emitting the ones that match the
//! configured event filter.
use std::time::Duration;

use envconfig::Envconfig;
use eyre::{Result, WrapErr};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use logrocket_common::metrics::{serve, setup_metrics_recorder};
use logrocket_common::time::SystemTime;
use sink::{ForwardSink, PrintSink};

mod config;
mod handlers;
mod sink;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::init_from_env().wrap_err("failed to load configuration from env")?;

    let recorder_handle = if config.export_prometheus {
        Some(setup_metrics_recorder().wrap_err("failed to install metrics recorder")?)
    } else {
        None
    };

    let app = match &config.forward_url {
        Some(url) => handlers::router(
            SystemTime {},
            ForwardSink::new(url, Duration::from_secs(config.forward_timeout_seconds))?,
            config.event.clone(),
            config.webhook_path.as_str(),
            recorder_handle,
        ),
        None => handlers::router(
            SystemTime {},
            PrintSink {},
            config.event.clone(),
            config.webhook_path.as_str(),
            recorder_handle,
        ),
    };

    info!(
        bind = %config.bind(),
        path = config.webhook_path.as_str(),
        event = %config.event,
        "starting logrocket-trigger"
    );

    serve(app, &config.bind())
        .await
        .wrap_err("failed to start logrocket-trigger http server")
}
