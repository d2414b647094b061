//! DynamoDB store implementation
//!
//! Provides `DynamoDbStore` which implements the `KeyValueStore` trait on
//! top of Amazon DynamoDB.

pub mod convert;
pub mod expr;
pub mod schema;

use crate::error::{AwsStoreError, Result};
use async_trait::async_trait;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::types::{Put, ReturnValue, TransactWriteItem as DdbTransactWriteItem};
use aws_sdk_dynamodb::Client;
use aws_smithy_types::timeout::TimeoutConfig;
use convert::{attributes_to_item, item_to_attributes};
use expr::ExpressionBuilder;
use passit_db_core::{
    CancellationReason, Item, Key, KeyCondition, KeyValueStore, PutRequest, ReadOptions,
    ReadOutput, StoreError, TableDescription, TransactWriteItem, UpdateRequest,
    UpdateTableRequest,
};
use std::time::Duration;
use tracing::debug;

/// DynamoDB store configuration
#[derive(Debug, Clone, Default)]
pub struct DynamoDbConfig {
    /// AWS region (optional, uses SDK default if not specified)
    pub region: Option<String>,
    /// Optional endpoint override (e.g. LocalStack)
    pub endpoint: Option<String>,
    /// Timeout in milliseconds
    pub timeout_ms: Option<u64>,
}

/// DynamoDB-backed key-value store
///
/// Holds one SDK client; table names travel with each request, so a single
/// store serves every table of the backend.
#[derive(Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl std::fmt::Debug for DynamoDbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoDbStore").finish_non_exhaustive()
    }
}

/// Map an SDK failure onto the store error taxonomy by service error code
fn map_sdk_error<E, R>(operation: &str, table: &str, err: SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    match err.code() {
        Some("ConditionalCheckFailedException") => StoreError::conditional_check_failed(table),
        Some("ResourceNotFoundException") => StoreError::table_not_found(table),
        Some("ResourceInUseException") | Some("LimitExceededException") => {
            StoreError::resource_in_use(format!("{}: {}", table, err.message().unwrap_or("")))
        }
        Some("ValidationException") => StoreError::validation(format!(
            "DynamoDB {} rejected: {}",
            operation,
            err.message().unwrap_or("")
        )),
        _ => StoreError::storage(format!(
            "DynamoDB {} failed: {}",
            operation,
            DisplayErrorContext(&err)
        )),
    }
}

impl DynamoDbStore {
    /// Create a new DynamoDB store
    ///
    /// Configuration:
    /// - `region`: Override SDK region (uses SDK default if not specified)
    /// - `endpoint`: Override the service endpoint (LocalStack)
    /// - `timeout_ms`: Operation timeout in milliseconds
    pub async fn new(sdk_config: &aws_config::SdkConfig, config: DynamoDbConfig) -> Result<Self> {
        // Inherit from SdkConfig (HTTP client, retry config, sleep impl) then apply overrides
        let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);

        if let Some(region_str) = config.region {
            builder = builder.region(aws_sdk_dynamodb::config::Region::new(region_str));
        }

        if let Some(endpoint) = config.endpoint {
            if endpoint.is_empty() {
                return Err(AwsStoreError::invalid_config("endpoint must not be empty"));
            }
            builder = builder.endpoint_url(endpoint);
        }

        if let Some(timeout_ms) = config.timeout_ms {
            let timeout_config = TimeoutConfig::builder()
                .operation_timeout(Duration::from_millis(timeout_ms))
                .build();
            builder = builder.timeout_config(timeout_config);
        }

        let conf = builder.build();
        if conf.region().is_none() {
            return Err(AwsStoreError::MissingRegion);
        }

        Ok(Self {
            client: Client::from_conf(conf),
        })
    }

    /// Create from a pre-built client (for testing)
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn build_put(request: PutRequest) -> std::result::Result<Put, StoreError> {
        let mut exprs = ExpressionBuilder::new();
        let condition = request.condition.as_ref().map(|c| exprs.condition(c));
        let (names, values) = exprs.into_parts();
        Put::builder()
            .table_name(request.table_name)
            .set_item(Some(item_to_attributes(&request.item)))
            .set_condition_expression(condition)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .build()
            .map_err(|e| AwsStoreError::dynamodb(e.to_string()).into())
    }

    fn read_output(
        items: &[std::collections::HashMap<String, aws_sdk_dynamodb::types::AttributeValue>],
        last_evaluated_key: Option<
            &std::collections::HashMap<String, aws_sdk_dynamodb::types::AttributeValue>,
        >,
    ) -> ReadOutput {
        ReadOutput {
            items: items.iter().map(attributes_to_item).collect(),
            last_evaluated_key: last_evaluated_key
                .filter(|k| !k.is_empty())
                .map(attributes_to_item),
        }
    }

    fn read_limit(options: &ReadOptions) -> std::result::Result<Option<i32>, StoreError> {
        options
            .limit
            .map(|l| {
                i32::try_from(l).map_err(|_| StoreError::validation("limit exceeds i32 range"))
            })
            .transpose()
    }
}

#[async_trait]
impl KeyValueStore for DynamoDbStore {
    async fn describe_table(&self, table_name: &str) -> passit_db_core::Result<TableDescription> {
        let response = self
            .client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|e| map_sdk_error("DescribeTable", table_name, e))?;

        let table = response
            .table()
            .ok_or_else(|| StoreError::table_not_found(table_name))?;
        Ok(schema::table_description(table_name, table))
    }

    async fn update_table(&self, request: UpdateTableRequest) -> passit_db_core::Result<()> {
        let definitions = request
            .attribute_definitions
            .iter()
            .map(schema::attribute_definition)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| AwsStoreError::dynamodb(e.to_string()))?;
        let update = schema::create_index_update(&request.create_index)
            .map_err(|e| AwsStoreError::dynamodb(e.to_string()))?;

        self.client
            .update_table()
            .table_name(&request.table_name)
            .set_attribute_definitions(Some(definitions))
            .global_secondary_index_updates(update)
            .send()
            .await
            .map_err(|e| map_sdk_error("UpdateTable", &request.table_name, e))?;

        debug!(
            table = %request.table_name,
            index = %request.create_index.index_name,
            "UpdateTable accepted"
        );
        Ok(())
    }

    async fn get_item(&self, table_name: &str, key: &Key) -> passit_db_core::Result<Option<Item>> {
        let response = self
            .client
            .get_item()
            .table_name(table_name)
            .set_key(Some(item_to_attributes(key)))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| map_sdk_error("GetItem", table_name, e))?;

        Ok(response.item().map(attributes_to_item))
    }

    async fn put_item(&self, request: PutRequest) -> passit_db_core::Result<()> {
        let table_name = request.table_name.clone();
        let mut exprs = ExpressionBuilder::new();
        let condition = request.condition.as_ref().map(|c| exprs.condition(c));
        let (names, values) = exprs.into_parts();

        self.client
            .put_item()
            .table_name(&table_name)
            .set_item(Some(item_to_attributes(&request.item)))
            .set_condition_expression(condition)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .send()
            .await
            .map_err(|e| map_sdk_error("PutItem", &table_name, e))?;
        Ok(())
    }

    async fn update_item(&self, request: UpdateRequest) -> passit_db_core::Result<Item> {
        if request.set.is_empty() {
            return Err(StoreError::validation("update sets no attributes"));
        }
        let mut exprs = ExpressionBuilder::new();
        let update = exprs.update_set(&request.set);
        let condition = request.condition.as_ref().map(|c| exprs.condition(c));
        let (names, values) = exprs.into_parts();

        let response = self
            .client
            .update_item()
            .table_name(&request.table_name)
            .set_key(Some(item_to_attributes(&request.key)))
            .update_expression(update)
            .set_condition_expression(condition)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| map_sdk_error("UpdateItem", &request.table_name, e))?;

        Ok(response
            .attributes()
            .map(attributes_to_item)
            .unwrap_or_default())
    }

    async fn transact_write(&self, items: Vec<TransactWriteItem>) -> passit_db_core::Result<()> {
        let tables: Vec<String> = items.iter().map(|i| i.table_name().to_string()).collect();
        let mut transact_items = Vec::with_capacity(items.len());
        for item in items {
            let TransactWriteItem::Put(put) = item;
            transact_items.push(
                DdbTransactWriteItem::builder()
                    .put(Self::build_put(put)?)
                    .build(),
            );
        }

        let result = self
            .client
            .transact_write_items()
            .set_transact_items(Some(transact_items))
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(SdkError::ServiceError(service_err)) => match service_err.err() {
                TransactWriteItemsError::TransactionCanceledException(canceled) => {
                    let reasons = canceled
                        .cancellation_reasons()
                        .iter()
                        .map(|r| CancellationReason::from_code(r.code().unwrap_or("None")))
                        .collect();
                    Err(StoreError::TransactionCanceled { reasons })
                }
                other => Err(StoreError::storage(format!(
                    "DynamoDB TransactWriteItems failed on {:?}: {}",
                    tables,
                    DisplayErrorContext(other)
                ))),
            },
            Err(e) => Err(map_sdk_error("TransactWriteItems", &tables.join(","), e)),
        }
    }

    async fn query(
        &self,
        table_name: &str,
        condition: &KeyCondition,
        options: &ReadOptions,
    ) -> passit_db_core::Result<ReadOutput> {
        let mut exprs = ExpressionBuilder::new();
        let key_condition = exprs.key_condition(condition);
        let filter = exprs.filter(&options.filter);
        let (names, values) = exprs.into_parts();

        let response = self
            .client
            .query()
            .table_name(table_name)
            .set_index_name(options.index_name.clone())
            .key_condition_expression(key_condition)
            .set_filter_expression(filter)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .set_exclusive_start_key(options.exclusive_start_key.as_ref().map(item_to_attributes))
            .set_limit(Self::read_limit(options)?)
            .scan_index_forward(options.scan_forward)
            .send()
            .await
            .map_err(|e| map_sdk_error("Query", table_name, e))?;

        Ok(Self::read_output(
            response.items(),
            response.last_evaluated_key(),
        ))
    }

    async fn scan(
        &self,
        table_name: &str,
        options: &ReadOptions,
    ) -> passit_db_core::Result<ReadOutput> {
        let mut exprs = ExpressionBuilder::new();
        let filter = exprs.filter(&options.filter);
        let (names, values) = exprs.into_parts();

        let response = self
            .client
            .scan()
            .table_name(table_name)
            .set_index_name(options.index_name.clone())
            .set_filter_expression(filter)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .set_exclusive_start_key(options.exclusive_start_key.as_ref().map(item_to_attributes))
            .set_limit(Self::read_limit(options)?)
            .send()
            .await
            .map_err(|e| map_sdk_error("Scan", table_name, e))?;

        Ok(Self::read_output(
            response.items(),
            response.last_evaluated_key(),
        ))
    }
}
