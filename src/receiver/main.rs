mod command;
mod queue;
mod slack;

use lambda_http::http::{Method, StatusCode};
use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use troutslap_shared::config::SlackAppCredentials;
use troutslap_shared::{
    Config, DynamoStore, Installation, InstallationStore, SlackClient, SlackResponse, SlapJob,
    SlashCommand,
};

use command::CommandIntent;
use queue::{JobQueue, SqsQueue};

const HELP_TEXT: &str = "@ mention one or more other users or bots to engage them in combat.\n\
                         Example usages: `/slap @larry`, `/slap @curly @moe` ";
const MASS_MENTION_TEXT: &str = "You don't stand a chance fighting that many people.";
const SELF_ONLY_TEXT: &str = "No one else is around. You slap yourself. The fish wins.";

const AUTHORIZE_URL: &str = "https://slack.com/oauth/v2/authorize";
const INSTALL_SCOPES: &str = "commands,chat:write,chat:write.public";

struct AppState {
    config: Config,
    credentials: SlackAppCredentials,
    slack: SlackClient,
    store: Arc<dyn InstallationStore>,
    queue: Arc<dyn JobQueue>,
}

async fn function_handler(state: &AppState, event: Request) -> Result<Response<Body>, Error> {
    let path = route_path(&event);

    match (event.method(), path) {
        (&Method::GET, "/status") => status(state),
        (&Method::GET, "/install") => install(state),
        (&Method::GET, "/oauth2_redirect") => oauth2_redirect(state, &event).await,
        (&Method::POST, "/hook") => hook(state, &event).await,
        _ => text_response(StatusCode::NOT_FOUND, "Not Found"),
    }
}

fn status(state: &AppState) -> Result<Response<Body>, Error> {
    json_response(
        StatusCode::OK,
        &serde_json::json!({ "status": "OK", "debug_mode": state.config.debug }),
    )
}

// Send the user to Slack to install the app in a workspace
fn install(state: &AppState) -> Result<Response<Body>, Error> {
    let location = format!(
        "{}?scope={}&client_id={}",
        AUTHORIZE_URL, INSTALL_SCOPES, state.credentials.client_id
    );

    Ok(Response::builder()
        .status(StatusCode::FOUND)
        .header("Location", location)
        .body(Body::Empty)?)
}

// Slack calls back here with a code to exchange for the workspace token
async fn oauth2_redirect(state: &AppState, event: &Request) -> Result<Response<Body>, Error> {
    let Some(code) = query_param(event, "code") else {
        warn!("event=install status=fail missing code");
        return text_response(StatusCode::BAD_REQUEST, "Missing code");
    };

    let exchange = match state
        .slack
        .exchange_code(
            &state.credentials.client_id,
            &state.credentials.client_secret,
            &code,
        )
        .await
    {
        Ok(exchange) => exchange,
        Err(e) => {
            error!(error = %e, "event=install status=fail");
            return text_response(StatusCode::INTERNAL_SERVER_ERROR, "Installation failed");
        }
    };

    let response = exchange.response;
    let installation = match (response.ok, response.team, response.access_token) {
        (true, Some(team), Some(access_token)) => Installation {
            team_id: team.id,
            team_name: team.name.unwrap_or_default(),
            access_token,
        },
        _ => {
            error!(
                status = exchange.status,
                error = response.error.as_deref().unwrap_or("unknown"),
                "event=install status=fail"
            );
            let status =
                StatusCode::from_u16(exchange.status).unwrap_or(StatusCode::BAD_GATEWAY);
            return text_response(status, "Installation failed");
        }
    };

    if let Err(e) = state.store.put(&installation).await {
        error!(team_id = %installation.team_id, error = %e, "event=install status=fail");
        return text_response(StatusCode::INTERNAL_SERVER_ERROR, "Installation failed");
    }

    info!(team_id = %installation.team_id, "event=install status=success");
    text_response(
        StatusCode::OK,
        format!("Successfully installed to {}!", installation.team_name),
    )
}

async fn hook(state: &AppState, event: &Request) -> Result<Response<Body>, Error> {
    let body: &[u8] = event.body().as_ref();
    let timestamp = header(event, "X-Slack-Request-Timestamp");
    let signature = header(event, "X-Slack-Signature");

    let now = chrono::Utc::now().timestamp();
    if !slack::is_timestamp_fresh(timestamp, now)
        || !slack::verify_slack_signature(
            state.credentials.signing_secret.as_bytes(),
            body,
            timestamp,
            signature,
        )
    {
        warn!("event=hook status=fail invalid request");
        return text_response(StatusCode::BAD_REQUEST, "Bad Request");
    }

    let command: SlashCommand = match serde_urlencoded::from_bytes(body) {
        Ok(command) => command,
        Err(e) => {
            warn!(error = %e, "event=hook status=fail unreadable form");
            return text_response(StatusCode::BAD_REQUEST, "Bad Request");
        }
    };
    debug!(?command, "hook payload");

    let team_id = command.team_id.as_str();
    let response = match command::parse(&command.text, &command.user_id) {
        CommandIntent::Help => {
            info!(team_id, kind = "help", "event=hook status=success");
            SlackResponse::ephemeral(HELP_TEXT)
        }
        // Never echo the text back, or the @-ing would reach the whole channel
        CommandIntent::MassMention => {
            info!(team_id, kind = "mass", "event=hook status=success");
            SlackResponse::ephemeral(MASS_MENTION_TEXT)
        }
        CommandIntent::SelfOnly => {
            info!(team_id, kind = "self", "event=hook status=success");
            SlackResponse::ephemeral(SELF_ONLY_TEXT)
        }
        CommandIntent::Combat {
            initiator,
            participants,
        } => {
            debug!(
                initiator = %initiator,
                involved = ?participants.as_slice(),
                "queuing normal slap"
            );
            let job = SlapJob {
                team_id: command.team_id.clone(),
                channel_id: command.channel_id.clone(),
                initiator,
                participants,
            };
            state.queue.submit(&job).await?;

            // in_channel so the user's invocation is shown to the channel
            SlackResponse::in_channel()
        }
    };

    json_response(StatusCode::OK, &response)
}

// API Gateway REST stages prefix the URI path (`/prod/hook`); the raw path
// lambda_http records does not carry the stage.
fn route_path(event: &Request) -> &str {
    let raw = event.raw_http_path();
    let path = if raw.is_empty() { event.uri().path() } else { raw };
    path.trim_end_matches('/')
}

fn header<'a>(event: &'a Request, name: &str) -> &'a str {
    event
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

fn query_param(event: &Request, name: &str) -> Option<String> {
    if let Some(value) = event
        .query_string_parameters_ref()
        .and_then(|params| params.first(name))
    {
        return Some(value.to_string());
    }

    let query = event.uri().query()?;
    serde_urlencoded::from_str::<Vec<(String, String)>>(query)
        .ok()?
        .into_iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(body)?))?)
}

fn text_response(status: StatusCode, text: impl Into<String>) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(Body::from(text.into()))?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env();
    troutslap_shared::init_tracing(config.debug);

    let credentials = SlackAppCredentials::from_env()?;
    let queue_url = std::env::var("SQS_QUEUE_URL")?;
    let aws_config = aws_config::load_from_env().await;

    let state = Arc::new(AppState {
        slack: SlackClient::new(&config.slack_api_base),
        store: Arc::new(DynamoStore::new(
            aws_sdk_dynamodb::Client::new(&aws_config),
            &config.installations_table,
        )),
        queue: Arc::new(SqsQueue::new(
            aws_sdk_sqs::Client::new(&aws_config),
            queue_url,
        )),
        credentials,
        config,
    });

    run(service_fn(move |event: Request| {
        let state = Arc::clone(&state);
        async move { function_handler(&state, event).await }
    }))
    .await
}
