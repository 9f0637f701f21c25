//! Small helpers over the raw DynamoDB item maps shared by every atom.
//!
//! All records live in one table keyed by string `PK`/`SK` attributes.

use aws_sdk_dynamodb::types::{AttributeValue, DeleteRequest, WriteRequest};
use aws_sdk_dynamodb::Client as DynamoClient;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::time::{sleep, Duration};

use crate::TodoError;

pub type Item = HashMap<String, AttributeValue>;

const BATCH_WRITE_LIMIT: usize = 25;
const BATCH_WRITE_ATTEMPTS: u64 = 5;

pub fn key(pk: &str, sk: &str) -> Item {
    let mut key = HashMap::new();
    key.insert("PK".to_string(), AttributeValue::S(pk.to_string()));
    key.insert("SK".to_string(), AttributeValue::S(sk.to_string()));
    key
}

pub fn string(item: &Item, name: &str) -> Option<String> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}

/// Like [`string`] but treats an empty string as absent.
pub fn non_empty_string(item: &Item, name: &str) -> Option<String> {
    string(item, name).filter(|s| !s.is_empty())
}

pub fn boolean(item: &Item, name: &str) -> Option<bool> {
    item.get(name).and_then(|v| v.as_bool().ok()).copied()
}

pub fn timestamp(item: &Item, name: &str) -> Option<DateTime<Utc>> {
    let raw = string(item, name)?;
    match DateTime::parse_from_rfc3339(&raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!("Ignoring malformed {} timestamp {:?}: {}", name, raw, e);
            None
        }
    }
}

/// The id part of the item's sort key, e.g. `TASK#abc` -> `abc`.
pub fn sort_key_id<'a>(item: &'a Item, prefix: &str) -> Option<&'a str> {
    item.get("SK")
        .and_then(|v| v.as_s().ok())
        .and_then(|sk| sk.strip_prefix(prefix))
}

/// Read every item under `pk` whose sort key starts with `sk_prefix`,
/// following `LastEvaluatedKey` until the partition is exhausted.
pub async fn query_partition(
    client: &DynamoClient,
    table_name: &str,
    pk: &str,
    sk_prefix: &str,
) -> Result<Vec<Item>, TodoError> {
    let mut items = Vec::new();
    let mut start_key: Option<Item> = None;

    loop {
        let result = client
            .query()
            .table_name(table_name)
            .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
            .expression_attribute_values(":pk", AttributeValue::S(pk.to_string()))
            .expression_attribute_values(":sk_prefix", AttributeValue::S(sk_prefix.to_string()))
            .set_exclusive_start_key(start_key.take())
            .send()
            .await
            .map_err(|e| TodoError::storage("query", e))?;

        items.extend(result.items().iter().cloned());

        match result.last_evaluated_key() {
            Some(last) if !last.is_empty() => start_key = Some(last.clone()),
            _ => break,
        }
    }

    Ok(items)
}

pub async fn get(
    client: &DynamoClient,
    table_name: &str,
    pk: &str,
    sk: &str,
) -> Result<Option<Item>, TodoError> {
    let result = client
        .get_item()
        .table_name(table_name)
        .set_key(Some(key(pk, sk)))
        .send()
        .await
        .map_err(|e| TodoError::storage("get_item", e))?;

    Ok(result.item().cloned())
}

/// Delete one record, failing with `NotFound(what)` when it was not there.
pub async fn delete_existing(
    client: &DynamoClient,
    table_name: &str,
    pk: &str,
    sk: &str,
    what: &str,
) -> Result<(), TodoError> {
    let result = client
        .delete_item()
        .table_name(table_name)
        .set_key(Some(key(pk, sk)))
        .return_values(aws_sdk_dynamodb::types::ReturnValue::AllOld)
        .send()
        .await
        .map_err(|e| TodoError::storage("delete_item", e))?;

    match result.attributes() {
        Some(old) if !old.is_empty() => Ok(()),
        _ => Err(TodoError::not_found(what)),
    }
}

/// Batch delete items (25 per request, unprocessed items retried with backoff).
pub async fn batch_delete(
    client: &DynamoClient,
    table_name: &str,
    keys: &[Item],
) -> Result<(), TodoError> {
    for chunk in keys.chunks(BATCH_WRITE_LIMIT) {
        let mut write_reqs = Vec::with_capacity(chunk.len());
        for k in chunk {
            let delete = DeleteRequest::builder()
                .set_key(Some(k.clone()))
                .build()
                .map_err(|e| TodoError::storage("batch_write_item", e))?;
            write_reqs.push(WriteRequest::builder().delete_request(delete).build());
        }

        let mut unprocessed = Some(write_reqs);
        let mut attempts = 0;
        while let Some(reqs) = unprocessed {
            attempts += 1;
            let result = client
                .batch_write_item()
                .request_items(table_name, reqs)
                .send()
                .await
                .map_err(|e| TodoError::storage("batch_write_item", e))?;

            unprocessed = result
                .unprocessed_items()
                .and_then(|m| m.get(table_name))
                .filter(|v| !v.is_empty())
                .cloned();

            if unprocessed.is_none() {
                break;
            }
            if attempts >= BATCH_WRITE_ATTEMPTS {
                return Err(TodoError::storage(
                    "batch_write_item",
                    format!("items still unprocessed after {} attempts", attempts),
                ));
            }
            sleep(Duration::from_millis(100 * attempts)).await;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(pairs: &[(&str, AttributeValue)]) -> Item {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn sort_key_id_strips_prefix() {
        let it = item(&[("SK", AttributeValue::S("TASK#abc".into()))]);
        assert_eq!(sort_key_id(&it, "TASK#"), Some("abc"));
        assert_eq!(sort_key_id(&it, "SPACE#"), None);
    }

    #[test]
    fn null_and_empty_strings_read_as_absent() {
        let it = item(&[
            ("space_id", AttributeValue::Null(true)),
            ("due_date", AttributeValue::S(String::new())),
        ]);
        assert_eq!(string(&it, "space_id"), None);
        assert_eq!(non_empty_string(&it, "due_date"), None);
        assert_eq!(string(&it, "due_date"), Some(String::new()));
    }

    #[test]
    fn malformed_timestamp_is_absent() {
        let it = item(&[
            ("created_at", AttributeValue::S("2025-03-01T10:00:00+00:00".into())),
            ("deleted_at", AttributeValue::S("yesterday".into())),
        ]);
        assert!(timestamp(&it, "created_at").is_some());
        assert_eq!(timestamp(&it, "deleted_at"), None);
    }
}
