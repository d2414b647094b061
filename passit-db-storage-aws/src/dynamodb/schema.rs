//! Conversions between Passit schema types and DynamoDB SDK schema types
//!
//! ## Index creation
//!
//! ```text
//! UpdateTable
//!   AttributeDefinitions: table partition key + index key attributes
//!   GlobalSecondaryIndexUpdates:
//!     - Create:
//!         IndexName
//!         KeySchema: [HASH, RANGE?]
//!         Projection: ALL
//!         ProvisionedThroughput: read/write capacity from the descriptor
//! ```

use aws_sdk_dynamodb::error::BuildError;
use aws_sdk_dynamodb::types::{
    self as ddb, AttributeDefinition, CreateGlobalSecondaryIndexAction, GlobalSecondaryIndexUpdate,
    KeySchemaElement, KeyType, Projection, ProjectionType, ProvisionedThroughput,
    ScalarAttributeType,
};
use passit_db_core::{
    IndexDescription, IndexDescriptor, IndexStatus, KeyAttribute, ScalarType, TableDescription,
    TableStatus,
};

fn scalar_attribute_type(attr_type: ScalarType) -> ScalarAttributeType {
    match attr_type {
        ScalarType::S => ScalarAttributeType::S,
        ScalarType::N => ScalarAttributeType::N,
        ScalarType::B => ScalarAttributeType::B,
    }
}

/// Creates an attribute definition for a key attribute.
pub fn attribute_definition(attr: &KeyAttribute) -> Result<AttributeDefinition, BuildError> {
    AttributeDefinition::builder()
        .attribute_name(&attr.name)
        .attribute_type(scalar_attribute_type(attr.attr_type))
        .build()
}

/// Creates a HASH (+ optional RANGE) key schema.
pub fn key_schema(
    partition_key: &KeyAttribute,
    sort_key: Option<&KeyAttribute>,
) -> Result<Vec<KeySchemaElement>, BuildError> {
    let mut schema = vec![KeySchemaElement::builder()
        .attribute_name(&partition_key.name)
        .key_type(KeyType::Hash)
        .build()?];
    if let Some(sort_key) = sort_key {
        schema.push(
            KeySchemaElement::builder()
                .attribute_name(&sort_key.name)
                .key_type(KeyType::Range)
                .build()?,
        );
    }
    Ok(schema)
}

/// Creates the GSI update that adds `index` with full item projection.
pub fn create_index_update(
    index: &IndexDescriptor,
) -> Result<GlobalSecondaryIndexUpdate, BuildError> {
    let action = CreateGlobalSecondaryIndexAction::builder()
        .index_name(&index.index_name)
        .set_key_schema(Some(key_schema(
            &index.partition_key,
            index.sort_key.as_ref(),
        )?))
        .projection(
            Projection::builder()
                .projection_type(ProjectionType::All)
                .build(),
        )
        .provisioned_throughput(
            ProvisionedThroughput::builder()
                .read_capacity_units(index.read_capacity)
                .write_capacity_units(index.write_capacity)
                .build()?,
        )
        .build()?;
    Ok(GlobalSecondaryIndexUpdate::builder().create(action).build())
}

/// Convert a DescribeTable response into the store-agnostic description.
///
/// DynamoDB omits the GSI list for tables without indexes; an empty list is
/// reported as `None` so both read as "nothing to wait for".
pub fn table_description(table_name: &str, table: &ddb::TableDescription) -> TableDescription {
    let status = table
        .table_status()
        .map(|s| TableStatus::parse(s.as_str()))
        .unwrap_or_else(|| TableStatus::Other("UNKNOWN".to_string()));

    let attribute_definitions = table
        .attribute_definitions()
        .iter()
        .filter_map(|d| {
            ScalarType::parse(d.attribute_type().as_str())
                .map(|t| KeyAttribute::new(d.attribute_name(), t))
        })
        .collect();

    let gsis = table.global_secondary_indexes();
    let indexes = if gsis.is_empty() {
        None
    } else {
        Some(
            gsis.iter()
                .map(|gsi| {
                    let key_name = |kind: KeyType| {
                        gsi.key_schema()
                            .iter()
                            .find(|k| *k.key_type() == kind)
                            .map(|k| k.attribute_name().to_string())
                    };
                    let throughput = gsi.provisioned_throughput();
                    IndexDescription {
                        index_name: gsi.index_name().unwrap_or_default().to_string(),
                        status: gsi
                            .index_status()
                            .map(|s| IndexStatus::parse(s.as_str()))
                            .unwrap_or_else(|| IndexStatus::Other("UNKNOWN".to_string())),
                        partition_key: key_name(KeyType::Hash),
                        sort_key: key_name(KeyType::Range),
                        read_capacity: throughput.and_then(|t| t.read_capacity_units()),
                        write_capacity: throughput.and_then(|t| t.write_capacity_units()),
                    }
                })
                .collect(),
        )
    };

    TableDescription {
        table_name: table
            .table_name()
            .unwrap_or(table_name)
            .to_string(),
        status,
        attribute_definitions,
        indexes,
    }
}
