mod combat;
mod slack;

use aws_lambda_events::event::sqs::SqsEvent;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;
use tracing::error;
use troutslap_shared::{Config, DynamoStore, InstallationStore, SlackClient, SlapJob};

struct AppState {
    config: Config,
    slack: SlackClient,
    store: Arc<dyn InstallationStore>,
}

async fn function_handler(state: &AppState, event: LambdaEvent<SqsEvent>) -> Result<(), Error> {
    // Process each SQS message
    for record in event.payload.records {
        let Some(body) = record.body else {
            continue;
        };

        let job: SlapJob = match serde_json::from_str(&body) {
            Ok(job) => job,
            Err(e) => {
                error!(error = %e, "event=job status=fail unreadable message");
                continue;
            }
        };

        // Nothing is retried: a job that fails here is dropped
        if let Err(e) =
            slack::give_em_the_slaps(&state.config, &state.slack, state.store.as_ref(), &job).await
        {
            error!(team_id = %job.team_id, error = %e, "event=job status=fail");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env();
    troutslap_shared::init_tracing(config.debug);

    let aws_config = aws_config::load_from_env().await;
    let state = Arc::new(AppState {
        slack: SlackClient::new(&config.slack_api_base),
        store: Arc::new(DynamoStore::new(
            aws_sdk_dynamodb::Client::new(&aws_config),
            &config.installations_table,
        )),
        config,
    });

    run(service_fn(move |event: LambdaEvent<SqsEvent>| {
        let state = Arc::clone(&state);
        async move { function_handler(&state, event).await }
    }))
    .await
}
