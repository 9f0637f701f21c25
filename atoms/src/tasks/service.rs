use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use chrono::{DateTime, Utc};

use super::model::{CreateTaskPayload, Task, UpdateTaskPayload, TASK_PK, TASK_SK_PREFIX};
use crate::dynamo;
use crate::lifecycle;
use crate::spaces;
use crate::TodoError;

/// Load every task record, whatever its lifecycle state (no HTTP).
/// Callers decide visibility through the lifecycle classifier.
pub async fn load_tasks(client: &DynamoClient, table_name: &str) -> Result<Vec<Task>, TodoError> {
    let items = dynamo::query_partition(client, table_name, TASK_PK, TASK_SK_PREFIX).await?;

    Ok(items
        .iter()
        .filter_map(|item| {
            dynamo::sort_key_id(item, TASK_SK_PREFIX).map(|id| Task::from_item(id, item))
        })
        .collect())
}

/// Get a specific task
pub async fn get_task(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
) -> Result<Task, TodoError> {
    match dynamo::get(client, table_name, TASK_PK, &Task::sort_key(task_id)).await? {
        Some(item) => Ok(Task::from_item(task_id, &item)),
        None => Err(TodoError::not_found("Task")),
    }
}

/// Create a new task. A referenced space has to exist.
pub async fn create_task(
    client: &DynamoClient,
    table_name: &str,
    payload: CreateTaskPayload,
) -> Result<Task, TodoError> {
    let task_id = uuid::Uuid::new_v4().to_string();
    let task = payload.into_task(task_id, Utc::now())?;
    if let Some(space_id) = &task.space_id {
        spaces::service::get_space(client, table_name, space_id).await?;
    }

    client
        .put_item()
        .table_name(table_name)
        .set_item(Some(task.to_item()))
        .send()
        .await
        .map_err(|e| TodoError::storage("put_item", e))?;

    tracing::info!("Created task {}", task.id);
    Ok(task)
}

/// Update a task (partial)
pub async fn update_task(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
    payload: UpdateTaskPayload,
) -> Result<Task, TodoError> {
    let mut task = get_task(client, table_name, task_id).await?;
    task.apply(&payload)?;
    if let (Some(Some(_)), Some(space_id)) = (&payload.space_id, &task.space_id) {
        spaces::service::get_space(client, table_name, space_id).await?;
    }

    let mut set_expr = vec![];
    let mut remove_expr = vec![];
    let mut builder = client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(TASK_PK.to_string()))
        .key("SK", AttributeValue::S(Task::sort_key(task_id)))
        .condition_expression("attribute_exists(PK)");

    if payload.text.is_some() {
        set_expr.push("#text = :text");
        builder = builder
            .expression_attribute_names("#text", "text")
            .expression_attribute_values(":text", AttributeValue::S(task.text.clone()));
    }

    if payload.completed.is_some() {
        set_expr.push("#completed = :completed");
        builder = builder
            .expression_attribute_names("#completed", "completed")
            .expression_attribute_values(":completed", AttributeValue::Bool(task.completed));
    }

    if payload.priority.is_some() {
        set_expr.push("#priority = :priority");
        builder = builder
            .expression_attribute_names("#priority", "priority")
            .expression_attribute_values(
                ":priority",
                AttributeValue::S(task.priority.as_str().to_string()),
            );
    }

    if payload.due_date.is_some() {
        match &task.due_date {
            Some(due) => {
                set_expr.push("due_date = :due_date");
                builder =
                    builder.expression_attribute_values(":due_date", AttributeValue::S(due.clone()));
            }
            None => remove_expr.push("due_date"),
        }
    }

    if payload.space_id.is_some() {
        match &task.space_id {
            Some(space_id) => {
                set_expr.push("space_id = :space_id");
                builder = builder
                    .expression_attribute_values(":space_id", AttributeValue::S(space_id.clone()));
            }
            None => remove_expr.push("space_id"),
        }
    }

    if set_expr.is_empty() && remove_expr.is_empty() {
        return Ok(task);
    }

    let mut clauses = vec![];
    if !set_expr.is_empty() {
        clauses.push(format!("SET {}", set_expr.join(", ")));
    }
    if !remove_expr.is_empty() {
        clauses.push(format!("REMOVE {}", remove_expr.join(", ")));
    }

    builder
        .update_expression(clauses.join(" "))
        .send()
        .await
        .map_err(|e| TodoError::storage("update_item", e))?;

    Ok(task)
}

/// Soft delete (Active -> Recoverable). A task that is already deleted
/// keeps its original deletion instant.
pub async fn soft_delete_task(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
) -> Result<Task, TodoError> {
    let mut task = get_task(client, table_name, task_id).await?;

    if lifecycle::soft_delete(&mut task, Utc::now()) {
        write_deleted_at(client, table_name, task_id, task.deleted_at).await?;
        tracing::info!("Soft-deleted task {}", task_id);
    }

    Ok(task)
}

/// Soft delete a batch of already-loaded tasks at one shared instant.
/// Returns how many actually changed state.
pub async fn soft_delete_tasks(
    client: &DynamoClient,
    table_name: &str,
    tasks: &mut [Task],
    now: DateTime<Utc>,
) -> Result<usize, TodoError> {
    let mut moved = 0;
    for task in tasks.iter_mut() {
        if lifecycle::soft_delete(task, now) {
            write_deleted_at(client, table_name, &task.id, task.deleted_at).await?;
            moved += 1;
        }
    }
    Ok(moved)
}

/// Restore (Recoverable/Purgeable -> Active)
pub async fn restore_task(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
) -> Result<Task, TodoError> {
    let mut task = get_task(client, table_name, task_id).await?;
    lifecycle::restore(&mut task)?;
    write_deleted_at(client, table_name, task_id, None).await?;

    tracing::info!("Restored task {}", task_id);
    Ok(task)
}

/// Permanently remove task records. Only the purge sweep calls this.
pub async fn delete_tasks(
    client: &DynamoClient,
    table_name: &str,
    task_ids: &[String],
) -> Result<(), TodoError> {
    let keys: Vec<dynamo::Item> = task_ids
        .iter()
        .map(|id| dynamo::key(TASK_PK, &Task::sort_key(id)))
        .collect();

    dynamo::batch_delete(client, table_name, &keys).await
}

async fn write_deleted_at(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
    deleted_at: Option<DateTime<Utc>>,
) -> Result<(), TodoError> {
    let builder = client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(TASK_PK.to_string()))
        .key("SK", AttributeValue::S(Task::sort_key(task_id)))
        .condition_expression("attribute_exists(PK)");

    let builder = match deleted_at {
        Some(at) => builder
            .update_expression("SET deleted_at = :deleted_at")
            .expression_attribute_values(":deleted_at", AttributeValue::S(at.to_rfc3339())),
        None => builder.update_expression("REMOVE deleted_at"),
    };

    builder
        .send()
        .await
        .map_err(|e| TodoError::storage("update_item", e))?;

    Ok(())
}
