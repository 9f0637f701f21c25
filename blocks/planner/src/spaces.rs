use aws_sdk_dynamodb::Client as DynamoClient;
use chrono::Utc;
use lambda_http::{Body, Error, Response};
use serde::Serialize;
use todo_atoms::lifecycle;
use todo_atoms::respond;
use todo_atoms::tasks::{self, Task};
use todo_atoms::{spaces, TodoError};

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpaceDeleted {
    pub id: String,
    pub deleted_tasks: usize,
}

/// Active tasks filed under `space_id`; these move to the trash with it.
pub fn cascade_targets(all: Vec<Task>, space_id: &str) -> Vec<Task> {
    lifecycle::active(all)
        .into_iter()
        .filter(|t| t.space_id.as_deref() == Some(space_id))
        .collect()
}

/// Delete a space. Its active tasks are soft-deleted at one shared
/// instant before the space record goes.
pub async fn delete_space(
    client: &DynamoClient,
    table_name: &str,
    space_id: &str,
) -> Result<Response<Body>, Error> {
    let result: Result<SpaceDeleted, TodoError> = async {
        spaces::service::get_space(client, table_name, space_id).await?;

        let all = tasks::service::load_tasks(client, table_name).await?;
        let mut targets = cascade_targets(all, space_id);
        let moved =
            tasks::service::soft_delete_tasks(client, table_name, &mut targets, Utc::now()).await?;

        spaces::service::delete_space_record(client, table_name, space_id).await?;

        tracing::info!("Deleted space {} and moved {} task(s) to trash", space_id, moved);
        Ok(SpaceDeleted {
            id: space_id.to_string(),
            deleted_tasks: moved,
        })
    }
    .await;

    respond::respond(result, |deleted| respond::ok(&deleted))
}
