use std::sync::Arc;

use aws_lambda_events::event::cloudwatch_events::CloudWatchEvent;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use planner_block::maintenance::{self, PurgeReport};
use todo_shared::{telemetry, AppState};

/// Scheduled sweep: hard-delete every task past its retention window,
/// together with the sub-lists it owns.
async fn function_handler(
    event: LambdaEvent<CloudWatchEvent>,
    state: Arc<AppState>,
) -> Result<PurgeReport, Error> {
    tracing::info!(
        "Purge triggered by {:?} ({:?})",
        event.payload.source,
        event.payload.detail_type
    );

    let report = maintenance::purge(
        &state.dynamo_client,
        &state.config.table_name,
        &state.config.retention,
    )
    .await
    .map_err(|e| {
        tracing::error!("Purge sweep failed: {}", e);
        e
    })?;

    Ok(report)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init_tracing();

    let state = Arc::new(AppState::from_env().await);

    run(service_fn(move |event: LambdaEvent<CloudWatchEvent>| {
        let state = Arc::clone(&state);
        async move { function_handler(event, state).await }
    }))
    .await
}
