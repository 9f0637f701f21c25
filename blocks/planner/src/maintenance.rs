use std::collections::HashSet;

use aws_sdk_dynamodb::Client as DynamoClient;
use chrono::{DateTime, Utc};
use lambda_http::{Body, Error, Response};
use serde::Serialize;
use todo_atoms::lifecycle::Retention;
use todo_atoms::respond;
use todo_atoms::sublists::{self, SubList};
use todo_atoms::tasks::{self, Task};
use todo_atoms::TodoError;

/// What a purge sweep will remove
#[derive(Debug, Default, PartialEq)]
pub struct PurgePlan {
    pub task_ids: Vec<String>,
    pub sublist_ids: Vec<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeReport {
    pub purged_tasks: usize,
    pub purged_sub_lists: usize,
}

/// Purgeable tasks plus every sub-list they own. Active and recoverable
/// tasks are never selected.
pub fn plan_purge(
    all_tasks: Vec<Task>,
    all_sublists: &[SubList],
    retention: &Retention,
    now: DateTime<Utc>,
) -> PurgePlan {
    let task_ids: Vec<String> = retention
        .purgeable(all_tasks, now)
        .into_iter()
        .map(|t| t.id)
        .collect();

    let doomed: HashSet<&str> = task_ids.iter().map(String::as_str).collect();
    let sublist_ids = all_sublists
        .iter()
        .filter(|l| doomed.contains(l.task_id.as_str()))
        .map(|l| l.id.clone())
        .collect();

    PurgePlan {
        task_ids,
        sublist_ids,
    }
}

/// Run the sweep. Shared by the scheduled purge Lambda and the maintenance route.
pub async fn purge(
    client: &DynamoClient,
    table_name: &str,
    retention: &Retention,
) -> Result<PurgeReport, TodoError> {
    let all_tasks = tasks::service::load_tasks(client, table_name).await?;
    let all_sublists = sublists::service::load_sublists(client, table_name).await?;
    let plan = plan_purge(all_tasks, &all_sublists, retention, Utc::now());

    if plan.task_ids.is_empty() {
        tracing::info!("Purge sweep found nothing to remove");
        return Ok(PurgeReport::default());
    }

    // Sub-lists go first so a failed sweep never leaves orphans behind.
    sublists::service::delete_sublists(client, table_name, &plan.sublist_ids).await?;
    tasks::service::delete_tasks(client, table_name, &plan.task_ids).await?;

    let report = PurgeReport {
        purged_tasks: plan.task_ids.len(),
        purged_sub_lists: plan.sublist_ids.len(),
    };
    tracing::info!(
        "Purged {} task(s) and {} sub-list(s)",
        report.purged_tasks,
        report.purged_sub_lists
    );
    Ok(report)
}

/// POST /maintenance/purge
pub async fn purge_now(
    client: &DynamoClient,
    table_name: &str,
    retention: &Retention,
) -> Result<Response<Body>, Error> {
    respond::respond(purge(client, table_name, retention).await, |report| {
        respond::ok(&report)
    })
}
