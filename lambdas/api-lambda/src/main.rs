use std::sync::Arc;

use lambda_http::{run, service_fn, Error, Request};
use todo_shared::{telemetry, AppState};

mod http_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init_tracing();

    let state = Arc::new(AppState::from_env().await);

    run(service_fn(move |event: Request| {
        let state = Arc::clone(&state);
        async move { http_handler::function_handler(event, state).await }
    }))
    .await
}
