use aws_sdk_dynamodb::Client as DynamoClient;
use chrono::{DateTime, Utc};
use lambda_http::{Body, Error, Response};
use todo_atoms::arrange::{arrange, Group, SortKey};
use todo_atoms::lifecycle::Retention;
use todo_atoms::respond;
use todo_atoms::tasks::{self, model::select_for_scope, Task};
use todo_atoms::view::Scope;

/// Tasks visible under `scope`, grouped for display.
///
/// Active scopes go through the sort/group engine. The trash is a single
/// unlabeled group, most recently deleted first, and ignores `sort_key`.
pub fn task_groups(
    all: Vec<Task>,
    scope: &Scope,
    sort_key: SortKey,
    retention: &Retention,
    now: DateTime<Utc>,
) -> Vec<Group<Task>> {
    let selected = select_for_scope(all, scope, retention, now);

    match scope {
        Scope::Deleted if selected.is_empty() => Vec::new(),
        Scope::Deleted => vec![Group {
            label: None,
            items: selected,
        }],
        _ => arrange(selected, sort_key),
    }
}

/// GET /tasks
pub async fn list_tasks(
    client: &DynamoClient,
    table_name: &str,
    scope: &Scope,
    sort_key: SortKey,
    retention: &Retention,
) -> Result<Response<Body>, Error> {
    respond::respond(tasks::service::load_tasks(client, table_name).await, |all| {
        let groups = task_groups(all, scope, sort_key, retention, Utc::now());
        tracing::info!("Listing {} task group(s) for scope {:?}", groups.len(), scope);
        respond::ok(&groups)
    })
}
