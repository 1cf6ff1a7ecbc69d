//! Minimal Slack Web API client: the OAuth exchange and `chat.postMessage`.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TroutslapError, TroutslapResult};

/// Reply from `oauth.v2.access`.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthAccessResponse {
    pub ok: bool,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub team: Option<OAuthTeam>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthTeam {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Outcome of a code exchange, with the HTTP status Slack answered with.
#[derive(Debug, Clone)]
pub struct OAuthExchange {
    pub status: u16,
    pub response: OAuthAccessResponse,
}

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SlackClient {
    client: Client,
    base_url: String,
}

impl SlackClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn exchange_code(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
    ) -> TroutslapResult<OAuthExchange> {
        let response = self
            .client
            .post(format!("{}/oauth.v2.access", self.base_url))
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("code", code),
            ])
            .send()
            .await?;

        let status = response.status().as_u16();
        let response: OAuthAccessResponse = response.json().await?;
        Ok(OAuthExchange { status, response })
    }

    pub async fn post_message(&self, token: &str, channel: &str, text: &str) -> TroutslapResult<()> {
        debug!("posting {}", text);

        let response = self
            .client
            .post(format!("{}/chat.postMessage", self.base_url))
            .bearer_auth(token)
            .json(&PostMessageRequest { channel, text })
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), "chat.postMessage responded");
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TroutslapError::Upstream(format!(
                "chat.postMessage returned {}: {}",
                status, error_text
            )));
        }

        let body: ApiResponse = response.json().await?;
        if !body.ok {
            return Err(TroutslapError::Upstream(
                body.error.unwrap_or_else(|| "unknown_error".to_string()),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_post_message_sends_bearer_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat.postMessage"))
            .and(header("Authorization", "Bearer xoxb-1"))
            .and(body_json(serde_json::json!({"channel": "C1", "text": "hello"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = SlackClient::new(server.uri());
        client.post_message("xoxb-1", "C1", "hello").await.unwrap();
    }

    #[tokio::test]
    async fn test_post_message_not_ok_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat.postMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"ok": false, "error": "channel_not_found"}),
            ))
            .mount(&server)
            .await;

        let client = SlackClient::new(server.uri());
        let err = client.post_message("xoxb-1", "C1", "hello").await.unwrap_err();
        assert!(matches!(err, TroutslapError::Upstream(ref e) if e == "channel_not_found"));
    }

    #[tokio::test]
    async fn test_post_message_http_failure_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = SlackClient::new(format!("{}/", server.uri()));
        let err = client.post_message("xoxb-1", "C1", "hello").await.unwrap_err();
        assert!(matches!(err, TroutslapError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_exchange_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth.v2.access"))
            .and(body_string_contains("code=abc"))
            .and(body_string_contains("client_id=cid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "access_token": "xoxb-new",
                "team": {"id": "T1", "name": "Fishmongers"}
            })))
            .mount(&server)
            .await;

        let client = SlackClient::new(server.uri());
        let exchange = client.exchange_code("cid", "secret", "abc").await.unwrap();
        assert_eq!(exchange.status, 200);
        assert!(exchange.response.ok);
        assert_eq!(exchange.response.access_token.as_deref(), Some("xoxb-new"));
        let team = exchange.response.team.unwrap();
        assert_eq!(team.id, "T1");
        assert_eq!(team.name.as_deref(), Some("Fishmongers"));
    }
}
