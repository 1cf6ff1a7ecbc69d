//! Per-workspace installation records.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{TroutslapError, TroutslapResult};
use crate::types::Installation;

#[async_trait]
pub trait InstallationStore: Send + Sync {
    /// Add a new installation or overwrite the existing one for its team.
    async fn put(&self, installation: &Installation) -> TroutslapResult<()>;

    async fn get(&self, team_id: &str) -> TroutslapResult<Option<Installation>>;

    /// Access token for `team_id`, failing when the workspace never installed.
    async fn load_token(&self, team_id: &str) -> TroutslapResult<String> {
        self.get(team_id)
            .await?
            .map(|installation| installation.access_token)
            .ok_or_else(|| TroutslapError::MissingCredential(team_id.to_string()))
    }
}

/// DynamoDB table keyed by `team_id`.
pub struct DynamoStore {
    client: aws_sdk_dynamodb::Client,
    table: String,
}

impl DynamoStore {
    pub fn new(client: aws_sdk_dynamodb::Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl InstallationStore for DynamoStore {
    async fn put(&self, installation: &Installation) -> TroutslapResult<()> {
        debug!(
            team_id = %installation.team_id,
            team_name = %installation.team_name,
            "storing token"
        );

        self.client
            .put_item()
            .table_name(&self.table)
            .item("team_id", AttributeValue::S(installation.team_id.clone()))
            .item("team_name", AttributeValue::S(installation.team_name.clone()))
            .item(
                "access_token",
                AttributeValue::S(installation.access_token.clone()),
            )
            .send()
            .await
            .map_err(|e| TroutslapError::Store(e.to_string()))?;

        Ok(())
    }

    async fn get(&self, team_id: &str) -> TroutslapResult<Option<Installation>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key("team_id", AttributeValue::S(team_id.to_string()))
            .send()
            .await
            .map_err(|e| TroutslapError::Store(e.to_string()))?;

        match output.item() {
            Some(item) => installation_from_item(item).map(Some),
            None => Ok(None),
        }
    }
}

fn installation_from_item(item: &HashMap<String, AttributeValue>) -> TroutslapResult<Installation> {
    let field = |name: &str| -> TroutslapResult<String> {
        item.get(name)
            .and_then(|value| value.as_s().ok())
            .cloned()
            .ok_or_else(|| TroutslapError::Store(format!("installation item missing {}", name)))
    };

    Ok(Installation {
        team_id: field("team_id")?,
        // Older rows may lack a name; the token is what matters.
        team_name: field("team_name").unwrap_or_default(),
        access_token: field("access_token")?,
    })
}

#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryStore;

#[cfg(any(test, feature = "test-util"))]
mod memory {
    use super::*;
    use std::sync::Mutex;

    /// Process-local store for tests.
    #[derive(Default)]
    pub struct MemoryStore {
        installations: Mutex<HashMap<String, Installation>>,
    }

    impl MemoryStore {
        pub fn with(installations: impl IntoIterator<Item = Installation>) -> Self {
            let store = Self::default();
            {
                let mut map = store.installations.lock().unwrap();
                for installation in installations {
                    map.insert(installation.team_id.clone(), installation);
                }
            }
            store
        }
    }

    #[async_trait]
    impl InstallationStore for MemoryStore {
        async fn put(&self, installation: &Installation) -> TroutslapResult<()> {
            self.installations
                .lock()
                .unwrap()
                .insert(installation.team_id.clone(), installation.clone());
            Ok(())
        }

        async fn get(&self, team_id: &str) -> TroutslapResult<Option<Installation>> {
            Ok(self.installations.lock().unwrap().get(team_id).cloned())
        }
    }
}
