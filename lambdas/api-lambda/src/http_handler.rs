use std::sync::Arc;

use lambda_http::{http::Method, Body, Error, Request, RequestExt, Response};
use planner_block as planner;
use todo_atoms::arrange::SortKey;
use todo_atoms::view::Scope;
use todo_atoms::{respond, spaces, sublists, tasks};
use todo_shared::{cors, AppState};

fn query<'a>(event: &'a Request, name: &str) -> Option<&'a str> {
    event
        .query_string_parameters_ref()
        .and_then(|params| params.first(name))
}

/// `sortBy` value, or `default` when absent or unrecognised.
fn sort_key(raw: Option<&str>, default: SortKey) -> SortKey {
    raw.and_then(SortKey::parse).unwrap_or(default)
}

/// Main Lambda handler - routes requests to task, space and sub-list endpoints
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method();
    let path = event.uri().path();
    let body: &[u8] = event.body().as_ref();
    let origin = state.config.cors_allowed_origin.as_str();
    tracing::info!("API invoked - Method: {} Path: {}", method, path);

    // Handle CORS preflight
    if method == Method::OPTIONS {
        return cors::preflight(origin);
    }

    let client = &state.dynamo_client;
    let table = state.config.table_name.as_str();
    let retention = &state.config.retention;

    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let resp = match (method, parts.as_slice()) {
        // ----- tasks -----
        (&Method::GET, ["tasks"]) => {
            let scope = Scope::parse(query(&event, "spaceId"));
            let key = sort_key(query(&event, "sortBy"), SortKey::DueDate);
            planner::tasks::list_tasks(client, table, &scope, key, retention).await
        }
        (&Method::POST, ["tasks"]) => tasks::http::create_task(client, table, body).await,
        (&Method::GET, ["tasks", id]) => tasks::http::get_task(client, table, id).await,
        (&Method::PUT | &Method::PATCH, ["tasks", id]) => {
            tasks::http::update_task(client, table, id, body).await
        }
        (&Method::DELETE, ["tasks", id]) => tasks::http::delete_task(client, table, id).await,
        (&Method::PUT, ["tasks", id, "restore"]) => {
            tasks::http::restore_task(client, table, id).await
        }
        (&Method::POST, ["maintenance", "purge"]) => {
            planner::maintenance::purge_now(client, table, retention).await
        }

        // ----- spaces -----
        (&Method::GET, ["spaces"]) => spaces::http::list_spaces(client, table).await,
        (&Method::POST, ["spaces"]) => spaces::http::create_space(client, table, body).await,
        (&Method::GET, ["spaces", id]) => spaces::http::get_space(client, table, id).await,
        (&Method::PUT | &Method::PATCH, ["spaces", id]) => {
            spaces::http::update_space(client, table, id, body).await
        }
        (&Method::DELETE, ["spaces", id]) => planner::spaces::delete_space(client, table, id).await,

        // ----- sub-lists -----
        (&Method::GET, ["sublists"]) => {
            sublists::http::list_sublists(client, table, query(&event, "taskId")).await
        }
        (&Method::POST, ["sublists"]) => sublists::http::create_sublist(client, table, body).await,
        (&Method::GET, ["sublists", id]) => sublists::http::get_sublist(client, table, id).await,
        (&Method::PUT | &Method::PATCH, ["sublists", id]) => {
            sublists::http::update_sublist(client, table, id, body).await
        }
        (&Method::DELETE, ["sublists", id]) => {
            sublists::http::delete_sublist(client, table, id).await
        }
        (&Method::GET, ["sublists", id, "items"]) => {
            let key = sort_key(query(&event, "sortBy"), SortKey::DueTime);
            planner::sublists::list_items(client, table, id, key).await
        }
        (&Method::POST, ["sublists", id, "items"]) => {
            sublists::http::add_item(client, table, id, body).await
        }
        (&Method::PUT | &Method::PATCH, ["sublists", id, "items", item_id]) => {
            sublists::http::update_item(client, table, id, item_id, body).await
        }
        (&Method::DELETE, ["sublists", id, "items", item_id]) => {
            sublists::http::delete_item(client, table, id, item_id).await
        }

        _ => {
            tracing::warn!("No route for {} {}", method, path);
            respond::not_found()
        }
    };

    cors::finalize_response(resp, origin)
}
