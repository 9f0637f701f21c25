use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{Body, Error, Response};

use super::model::{
    CreateItemPayload, CreateSubListPayload, SubList, UpdateItemPayload, UpdateSubListPayload,
};
use super::service;
use crate::respond;
use crate::TodoError;

/// List the sub-lists of a task; `taskId` is mandatory.
pub async fn list_sublists(
    client: &DynamoClient,
    table_name: &str,
    task_id: Option<&str>,
) -> Result<Response<Body>, Error> {
    let task_id = match task_id.map(str::trim).filter(|t| !t.is_empty()) {
        Some(id) => id,
        None => return respond::bad_request("taskId is required"),
    };

    respond::respond(
        service::load_sublists_for_task(client, table_name, task_id).await,
        |lists| respond::ok(&lists),
    )
}

pub async fn get_sublist(
    client: &DynamoClient,
    table_name: &str,
    sublist_id: &str,
) -> Result<Response<Body>, Error> {
    respond::respond(
        service::get_sublist(client, table_name, sublist_id).await,
        |list| respond::ok(&list),
    )
}

pub async fn create_sublist(
    client: &DynamoClient,
    table_name: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let result: Result<SubList, TodoError> = async {
        let payload: CreateSubListPayload = respond::parse_body(body)?;
        service::create_sublist(client, table_name, payload).await
    }
    .await;

    respond::respond(result, |list| respond::created(&list))
}

pub async fn update_sublist(
    client: &DynamoClient,
    table_name: &str,
    sublist_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let result: Result<SubList, TodoError> = async {
        let payload: UpdateSubListPayload = respond::parse_body(body)?;
        service::update_sublist(client, table_name, sublist_id, payload).await
    }
    .await;

    respond::respond(result, |list| respond::ok(&list))
}

pub async fn delete_sublist(
    client: &DynamoClient,
    table_name: &str,
    sublist_id: &str,
) -> Result<Response<Body>, Error> {
    respond::respond(
        service::delete_sublist(client, table_name, sublist_id).await,
        |_| respond::no_content(),
    )
}

/// Add an item; responds with the whole updated sub-list
pub async fn add_item(
    client: &DynamoClient,
    table_name: &str,
    sublist_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let result: Result<SubList, TodoError> = async {
        let payload: CreateItemPayload = respond::parse_body(body)?;
        service::add_item(client, table_name, sublist_id, payload).await
    }
    .await;

    respond::respond(result, |list| respond::created(&list))
}

pub async fn update_item(
    client: &DynamoClient,
    table_name: &str,
    sublist_id: &str,
    item_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let result: Result<SubList, TodoError> = async {
        let payload: UpdateItemPayload = respond::parse_body(body)?;
        service::update_item(client, table_name, sublist_id, item_id, payload).await
    }
    .await;

    respond::respond(result, |list| respond::ok(&list))
}

pub async fn delete_item(
    client: &DynamoClient,
    table_name: &str,
    sublist_id: &str,
    item_id: &str,
) -> Result<Response<Body>, Error> {
    respond::respond(
        service::delete_item(client, table_name, sublist_id, item_id).await,
        |list| respond::ok(&list),
    )
}
