pub mod config;
pub mod cors;
pub mod telemetry;

use aws_sdk_dynamodb::Client as DynamoClient;

pub use config::Config;

/// Per-cold-start state shared by every invocation of a Lambda.
pub struct AppState {
    pub dynamo_client: DynamoClient,
    pub config: Config,
}

impl AppState {
    pub fn new(dynamo_client: DynamoClient, config: Config) -> AppState {
        AppState {
            dynamo_client,
            config,
        }
    }

    /// Load AWS credentials/region from the default chain and read `Config`
    /// from the process environment.
    pub async fn from_env() -> AppState {
        let aws = aws_config::load_from_env().await;
        let config = Config::from_env();
        tracing::info!(
            "Using table {} (retention {} days)",
            config.table_name,
            config.retention.window().num_days()
        );
        AppState::new(DynamoClient::new(&aws), config)
    }
}
