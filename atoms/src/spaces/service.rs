use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use chrono::Utc;

use super::model::{required_name, CreateSpacePayload, Space, UpdateSpacePayload, SPACE_PK, SPACE_SK_PREFIX};
use crate::dynamo;
use crate::TodoError;

/// All spaces, oldest first
pub async fn load_spaces(client: &DynamoClient, table_name: &str) -> Result<Vec<Space>, TodoError> {
    let items = dynamo::query_partition(client, table_name, SPACE_PK, SPACE_SK_PREFIX).await?;

    let mut spaces: Vec<Space> = items
        .iter()
        .filter_map(|item| {
            dynamo::sort_key_id(item, SPACE_SK_PREFIX).map(|id| Space::from_item(id, item))
        })
        .collect();
    spaces.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));

    Ok(spaces)
}

pub async fn get_space(
    client: &DynamoClient,
    table_name: &str,
    space_id: &str,
) -> Result<Space, TodoError> {
    match dynamo::get(client, table_name, SPACE_PK, &Space::sort_key(space_id)).await? {
        Some(item) => Ok(Space::from_item(space_id, &item)),
        None => Err(TodoError::not_found("Space")),
    }
}

pub async fn create_space(
    client: &DynamoClient,
    table_name: &str,
    payload: CreateSpacePayload,
) -> Result<Space, TodoError> {
    let space = Space {
        id: uuid::Uuid::new_v4().to_string(),
        name: required_name(&payload.name)?,
        created_at: Utc::now(),
    };

    client
        .put_item()
        .table_name(table_name)
        .set_item(Some(space.to_item()))
        .send()
        .await
        .map_err(|e| TodoError::storage("put_item", e))?;

    tracing::info!("Created space {} ({})", space.id, space.name);
    Ok(space)
}

/// Rename a space
pub async fn update_space(
    client: &DynamoClient,
    table_name: &str,
    space_id: &str,
    payload: UpdateSpacePayload,
) -> Result<Space, TodoError> {
    let mut space = get_space(client, table_name, space_id).await?;

    if let Some(name) = payload.name {
        space.name = required_name(&name)?;
        client
            .update_item()
            .table_name(table_name)
            .key("PK", AttributeValue::S(SPACE_PK.to_string()))
            .key("SK", AttributeValue::S(Space::sort_key(space_id)))
            .condition_expression("attribute_exists(PK)")
            .update_expression("SET #name = :name")
            .expression_attribute_names("#name", "name")
            .expression_attribute_values(":name", AttributeValue::S(space.name.clone()))
            .send()
            .await
            .map_err(|e| TodoError::storage("update_item", e))?;
    }

    Ok(space)
}

/// Remove the space record only. Its tasks are handled by the caller.
pub async fn delete_space_record(
    client: &DynamoClient,
    table_name: &str,
    space_id: &str,
) -> Result<(), TodoError> {
    dynamo::delete_existing(client, table_name, SPACE_PK, &Space::sort_key(space_id), "Space").await
}
