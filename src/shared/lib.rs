//! Pieces shared by the troutslap receiver and processor functions.
//!
//! The receiver answers Slack over HTTP and queues combat jobs; the
//! processor picks those jobs up and posts the slaps. Both need the same
//! domain types, configuration, Slack Web API client and installation store,
//! which live here.

pub mod config;
pub mod error;
pub mod slack;
pub mod store;
pub mod types;

pub use config::Config;
pub use error::{TroutslapError, TroutslapResult};
pub use slack::SlackClient;
pub use store::{DynamoStore, InstallationStore};
pub use types::*;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `debug` in debug mode
/// and `info` everywhere else.
pub fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
