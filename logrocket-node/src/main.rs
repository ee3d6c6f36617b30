//! Run one LogRocket operation over a batch of input items.
//!
//! Items are read from stdin, either as one JSON array or as one JSON object per line, and
//! every output record is written to stdout as a JSON line.
use std::io::{self, Read, Write};

use envconfig::Envconfig;
use eyre::{Result, WrapErr};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use logrocket_node::batch::run_batch;
use logrocket_node::config::Config;
use logrocket_node::error::NodeError;
use logrocket_node::params::Parameters;

/// Parse stdin into input items. Empty input counts as a single item without parameters.
fn parse_items(input: &str) -> Result<Vec<Parameters>, NodeError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(vec![Parameters::default()]);
    }

    let values: Vec<Value> = if input.starts_with('[') {
        serde_json::from_str(input).map_err(|e| NodeError::InvalidInput(e.to_string()))?
    } else {
        input
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(|e| NodeError::InvalidInput(e.to_string())))
            .collect::<Result<_, _>>()?
    };

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::Object(map) => Ok(Parameters::from(map)),
            _ => Err(NodeError::InvalidInput(format!(
                "item {} is not a JSON object",
                index
            ))),
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::init_from_env().wrap_err("failed to load configuration from env")?;
    let client = config.client()?;

    info!(
        resource = config.resource.as_str(),
        operation = config.operation.as_str(),
        "starting logrocket-node"
    );

    if config.verify_credentials {
        client
            .verify_credentials()
            .await
            .wrap_err("LogRocket credentials were rejected")?;
    }

    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let items = parse_items(&input)?;

    let outputs = run_batch(
        &client,
        config.resource.as_str(),
        config.operation.as_str(),
        &items,
        config.continue_on_fail,
    )
    .await?;

    let mut stdout = io::stdout().lock();
    for output in &outputs {
        serde_json::to_writer(&mut stdout, output)?;
        writeln!(stdout)?;
    }

    info!(items = items.len(), outputs = outputs.len(), "batch finished");

    Ok(())
}
