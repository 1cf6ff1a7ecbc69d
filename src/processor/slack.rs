use std::time::Duration;
use tracing::{debug, error, info, warn};
use troutslap_shared::{Config, InstallationStore, SlackClient, SlapJob, TroutslapResult};

use crate::combat;

/// Play out `job` and post every line of it to the channel, in order.
///
/// A failed post is logged and the rest still go out. Returns how many
/// posts Slack accepted; a workspace with no stored token is an error.
pub async fn give_em_the_slaps(
    config: &Config,
    slack: &SlackClient,
    store: &dyn InstallationStore,
    job: &SlapJob,
) -> TroutslapResult<usize> {
    // Give the user's own command a head start in the channel
    pause(config.initial_pause()).await;

    let result = {
        let mut rng = rand::rng();
        combat::generate(&job.initiator, &job.participants, &mut rng)
    };
    let Some(result) = result else {
        warn!(team_id = %job.team_id, "job has nobody to fight, skipping");
        return Ok(0);
    };

    let messages = result.messages();
    info!(
        team_id = %job.team_id,
        kind = "normal",
        length = messages.len(),
        players = job.participants.len(),
        "event=hook status=success"
    );

    let token = store.load_token(&job.team_id).await?;

    let mut posted = 0;
    for message in &messages {
        match slack.post_message(&token, &job.channel_id, message).await {
            Ok(()) => posted += 1,
            Err(e) => error!(
                team_id = %job.team_id,
                channel_id = %job.channel_id,
                error = %e,
                "event=post status=fail"
            ),
        }
        pause(config.pause()).await;
    }

    debug!(posted, total = messages.len(), "combat delivered");
    Ok(posted)
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
