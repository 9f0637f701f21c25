use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{Body, Error, Response};

use super::model::{CreateSpacePayload, Space, UpdateSpacePayload};
use super::service;
use crate::respond;
use crate::TodoError;

pub async fn list_spaces(client: &DynamoClient, table_name: &str) -> Result<Response<Body>, Error> {
    respond::respond(service::load_spaces(client, table_name).await, |spaces| {
        respond::ok(&spaces)
    })
}

pub async fn get_space(
    client: &DynamoClient,
    table_name: &str,
    space_id: &str,
) -> Result<Response<Body>, Error> {
    respond::respond(service::get_space(client, table_name, space_id).await, |space| {
        respond::ok(&space)
    })
}

pub async fn create_space(
    client: &DynamoClient,
    table_name: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let result: Result<Space, TodoError> = async {
        let payload: CreateSpacePayload = respond::parse_body(body)?;
        service::create_space(client, table_name, payload).await
    }
    .await;

    respond::respond(result, |space| respond::created(&space))
}

pub async fn update_space(
    client: &DynamoClient,
    table_name: &str,
    space_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let result: Result<Space, TodoError> = async {
        let payload: UpdateSpacePayload = respond::parse_body(body)?;
        service::update_space(client, table_name, space_id, payload).await
    }
    .await;

    respond::respond(result, |space| respond::ok(&space))
}
