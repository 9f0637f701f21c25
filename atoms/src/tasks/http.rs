use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{Body, Error, Response};

use super::model::{CreateTaskPayload, Task, UpdateTaskPayload};
use super::service;
use crate::respond;
use crate::TodoError;

/// Get a single task
pub async fn get_task(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
) -> Result<Response<Body>, Error> {
    respond::respond(service::get_task(client, table_name, task_id).await, |task| {
        respond::ok(&task)
    })
}

/// Create a new task
pub async fn create_task(
    client: &DynamoClient,
    table_name: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let result: Result<Task, TodoError> = async {
        let payload: CreateTaskPayload = respond::parse_body(body)?;
        service::create_task(client, table_name, payload).await
    }
    .await;

    respond::respond(result, |task| respond::created(&task))
}

/// Update a task (text, completed, dueDate, priority, spaceId)
pub async fn update_task(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let result: Result<Task, TodoError> = async {
        let payload: UpdateTaskPayload = respond::parse_body(body)?;
        service::update_task(client, table_name, task_id, payload).await
    }
    .await;

    respond::respond(result, |task| respond::ok(&task))
}

/// Delete a task (soft delete, restorable for the retention window)
pub async fn delete_task(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
) -> Result<Response<Body>, Error> {
    respond::respond(
        service::soft_delete_task(client, table_name, task_id).await,
        |task| respond::ok(&task),
    )
}

/// Restore a soft-deleted task
pub async fn restore_task(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
) -> Result<Response<Body>, Error> {
    respond::respond(
        service::restore_task(client, table_name, task_id).await,
        |task| respond::ok(&task),
    )
}
