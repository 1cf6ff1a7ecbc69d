use async_trait::async_trait;
use troutslap_shared::{SlapJob, TroutslapError, TroutslapResult};

/// Hands combat jobs to the processor. `submit` returns once the job is
/// queued, long before anything is posted.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn submit(&self, job: &SlapJob) -> TroutslapResult<()>;
}

pub struct SqsQueue {
    client: aws_sdk_sqs::Client,
    queue_url: String,
}

impl SqsQueue {
    pub fn new(client: aws_sdk_sqs::Client, queue_url: impl Into<String>) -> Self {
        Self {
            client,
            queue_url: queue_url.into(),
        }
    }
}

#[async_trait]
impl JobQueue for SqsQueue {
    async fn submit(&self, job: &SlapJob) -> TroutslapResult<()> {
        let message_body = serde_json::to_string(job)?;

        self.client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(message_body)
            .send()
            .await
            .map_err(|e| TroutslapError::Queue(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
pub use recording::RecordingQueue;
