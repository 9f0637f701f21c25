use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use chrono::Utc;

use super::model::{
    CreateItemPayload, CreateSubListPayload, SubList, UpdateItemPayload, UpdateSubListPayload,
    SUBLIST_PK, SUBLIST_SK_PREFIX,
};
use crate::dynamo;
use crate::tasks;
use crate::TodoError;

/// Every sub-list in the table (the purge sweep needs them all)
pub async fn load_sublists(client: &DynamoClient, table_name: &str) -> Result<Vec<SubList>, TodoError> {
    let items = dynamo::query_partition(client, table_name, SUBLIST_PK, SUBLIST_SK_PREFIX).await?;

    items
        .iter()
        .filter_map(|item| {
            dynamo::sort_key_id(item, SUBLIST_SK_PREFIX).map(|id| SubList::from_item(id, item))
        })
        .collect()
}

/// Sub-lists attached to one task
pub async fn load_sublists_for_task(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
) -> Result<Vec<SubList>, TodoError> {
    let all = load_sublists(client, table_name).await?;

    Ok(all.into_iter().filter(|l| l.task_id == task_id).collect())
}

pub async fn get_sublist(
    client: &DynamoClient,
    table_name: &str,
    sublist_id: &str,
) -> Result<SubList, TodoError> {
    match dynamo::get(client, table_name, SUBLIST_PK, &SubList::sort_key(sublist_id)).await? {
        Some(item) => SubList::from_item(sublist_id, &item),
        None => Err(TodoError::not_found("Sub-list")),
    }
}

/// Create a sub-list for an existing task
pub async fn create_sublist(
    client: &DynamoClient,
    table_name: &str,
    payload: CreateSubListPayload,
) -> Result<SubList, TodoError> {
    let sublist = payload.into_sublist(uuid::Uuid::new_v4().to_string())?;
    tasks::service::get_task(client, table_name, &sublist.task_id).await?;

    client
        .put_item()
        .table_name(table_name)
        .set_item(Some(sublist.to_item()?))
        .send()
        .await
        .map_err(|e| TodoError::storage("put_item", e))?;

    tracing::info!("Created sub-list {} for task {}", sublist.id, sublist.task_id);
    Ok(sublist)
}

/// Rename a sub-list
pub async fn update_sublist(
    client: &DynamoClient,
    table_name: &str,
    sublist_id: &str,
    payload: UpdateSubListPayload,
) -> Result<SubList, TodoError> {
    let mut sublist = get_sublist(client, table_name, sublist_id).await?;

    if let Some(name) = payload.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(TodoError::validation("Sub-list name is required"));
        }
        sublist.name = name.to_string();

        client
            .update_item()
            .table_name(table_name)
            .key("PK", AttributeValue::S(SUBLIST_PK.to_string()))
            .key("SK", AttributeValue::S(SubList::sort_key(sublist_id)))
            .condition_expression("attribute_exists(PK)")
            .update_expression("SET #name = :name")
            .expression_attribute_names("#name", "name")
            .expression_attribute_values(":name", AttributeValue::S(sublist.name.clone()))
            .send()
            .await
            .map_err(|e| TodoError::storage("update_item", e))?;
    }

    Ok(sublist)
}

/// Hard delete a sub-list and its embedded items
pub async fn delete_sublist(
    client: &DynamoClient,
    table_name: &str,
    sublist_id: &str,
) -> Result<(), TodoError> {
    dynamo::delete_existing(
        client,
        table_name,
        SUBLIST_PK,
        &SubList::sort_key(sublist_id),
        "Sub-list",
    )
    .await
}

/// Hard delete many sub-lists at once (purge cascade)
pub async fn delete_sublists(
    client: &DynamoClient,
    table_name: &str,
    sublist_ids: &[String],
) -> Result<(), TodoError> {
    let keys: Vec<dynamo::Item> = sublist_ids
        .iter()
        .map(|id| dynamo::key(SUBLIST_PK, &SubList::sort_key(id)))
        .collect();

    dynamo::batch_delete(client, table_name, &keys).await
}

pub async fn add_item(
    client: &DynamoClient,
    table_name: &str,
    sublist_id: &str,
    payload: CreateItemPayload,
) -> Result<SubList, TodoError> {
    let mut sublist = get_sublist(client, table_name, sublist_id).await?;
    sublist.add_item(payload, uuid::Uuid::new_v4().to_string(), Utc::now());
    save_items(client, table_name, &sublist).await?;
    Ok(sublist)
}

pub async fn update_item(
    client: &DynamoClient,
    table_name: &str,
    sublist_id: &str,
    item_id: &str,
    payload: UpdateItemPayload,
) -> Result<SubList, TodoError> {
    let mut sublist = get_sublist(client, table_name, sublist_id).await?;
    sublist.update_item(item_id, payload)?;
    save_items(client, table_name, &sublist).await?;
    Ok(sublist)
}

pub async fn delete_item(
    client: &DynamoClient,
    table_name: &str,
    sublist_id: &str,
    item_id: &str,
) -> Result<SubList, TodoError> {
    let mut sublist = get_sublist(client, table_name, sublist_id).await?;
    sublist.remove_item(item_id)?;
    save_items(client, table_name, &sublist).await?;
    Ok(sublist)
}

async fn save_items(
    client: &DynamoClient,
    table_name: &str,
    sublist: &SubList,
) -> Result<(), TodoError> {
    client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(SUBLIST_PK.to_string()))
        .key("SK", AttributeValue::S(SubList::sort_key(&sublist.id)))
        .condition_expression("attribute_exists(PK)")
        .update_expression("SET #items = :items")
        .expression_attribute_names("#items", "items")
        .expression_attribute_values(":items", sublist.items_attribute()?)
        .send()
        .await
        .map_err(|e| TodoError::storage("update_item", e))?;

    Ok(())
}
