use crate::cli::Cli;
use crate::error::CliResult;
use passit_db_storage_aws::{DynamoDbConfig, DynamoDbStore};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Build the DynamoDB store from the global flags
pub async fn build_store(cli: &Cli) -> CliResult<Arc<DynamoDbStore>> {
    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let config = DynamoDbConfig {
        region: cli.region.clone(),
        endpoint: cli.endpoint.clone(),
        timeout_ms: cli.timeout_ms,
    };
    tracing::debug!(?config, "connecting to DynamoDB");
    Ok(Arc::new(DynamoDbStore::new(&sdk_config, config).await?))
}

/// Read JSON from a file, or from stdin when `path` is `-`
pub fn read_json(path: &Path) -> CliResult<serde_json::Value> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|e| {
            crate::error::CliError::Input(format!("cannot read {}: {e}", path.display()))
        })?
    };
    Ok(serde_json::from_str(&text)?)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
