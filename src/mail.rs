use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::MailConfig;

/// Secrets for the OAuth2 refresh-token exchange
#[derive(Debug, Clone)]
pub struct MailCredentials {
    pub client_secret: String,
    pub refresh_token: String,
}

/// Mail delivery for finished reports
pub struct MailService {
    client: Client,
    config: Option<MailConfig>,
}

impl MailService {
    pub fn from_config(config: &MailConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.enabled.then(|| config.clone()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Authenticate and send the report to every configured recipient
    pub async fn deliver(
        &self,
        credentials: &MailCredentials,
        subject: &str,
        body: &str,
    ) -> Result<()> {
        let Some(config) = &self.config else {
            debug!("Mail delivery disabled");
            return Ok(());
        };

        let transport = MailTransport::connect(&self.client, config, credentials).await?;
        transport.send(subject, body).await
    }
}

/// An authenticated, send-capable mail transport
pub struct MailTransport {
    client: Client,
    send_url: String,
    recipients: Vec<String>,
    access_token: String,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMailRequest {
    message: MailMessage,
    save_to_sent_items: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MailMessage {
    subject: String,
    body: MailBody,
    to_recipients: Vec<Recipient>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MailBody {
    content_type: &'static str,
    content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Recipient {
    email_address: EmailAddress,
}

#[derive(Serialize)]
struct EmailAddress {
    address: String,
}

impl MailTransport {
    /// Exchange the refresh token for an access token
    pub async fn connect(
        client: &Client,
        config: &MailConfig,
        credentials: &MailCredentials,
    ) -> Result<Self> {
        let client_id = config
            .client_id
            .as_deref()
            .context("mail.client_id is not configured")?;
        let account = config
            .account
            .as_deref()
            .context("mail.account is not configured")?;

        if config.recipients.is_empty() {
            anyhow::bail!("mail.recipients is empty");
        }

        debug!(token_url = %config.token_url, "Requesting mail access token");

        let response = client
            .post(&config.token_url)
            .form(&TokenRequest {
                grant_type: "refresh_token",
                client_id,
                client_secret: &credentials.client_secret,
                refresh_token: &credentials.refresh_token,
            })
            .send()
            .await
            .context("Failed to reach mail token endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Mail authentication failed");
            anyhow::bail!("Mail token endpoint returned error: {} - {}", status, body);
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse mail token response")?;

        info!(account, "Mail transport authenticated");

        Ok(Self {
            client: client.clone(),
            send_url: config.send_url.replace("{account}", account),
            recipients: config.recipients.clone(),
            access_token: token.access_token,
        })
    }

    /// Send a plain-text message
    pub async fn send(&self, subject: &str, body: &str) -> Result<()> {
        let request = SendMailRequest {
            message: MailMessage {
                subject: subject.to_string(),
                body: MailBody {
                    content_type: "Text",
                    content: body.to_string(),
                },
                to_recipients: self
                    .recipients
                    .iter()
                    .map(|address| Recipient {
                        email_address: EmailAddress {
                            address: address.clone(),
                        },
                    })
                    .collect(),
            },
            save_to_sent_items: true,
        };

        let response = self
            .client
            .post(&self.send_url)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .context("Failed to send report mail")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Report mail failed");
            anyhow::bail!("Mail send endpoint returned error: {} - {}", status, body);
        }

        info!(recipients = self.recipients.len(), "Report mail sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> MailConfig {
        MailConfig {
            enabled: true,
            client_id: Some("client-1".to_string()),
            account: Some("reports@acme.dev".to_string()),
            recipients: vec!["team@acme.dev".to_string(), "lead@acme.dev".to_string()],
            token_url: format!("{}/token", server.uri()),
            send_url: format!("{}/users/{{account}}/sendMail", server.uri()),
        }
    }

    fn credentials() -> MailCredentials {
        MailCredentials {
            client_secret: "secret".to_string(),
            refresh_token: "refresh".to_string(),
        }
    }

    #[test]
    fn test_mail_service_disabled() {
        let service = MailService::from_config(&MailConfig::default());
        assert!(!service.is_enabled());
    }

    #[tokio::test]
    async fn test_deliver_authenticates_then_sends() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=refresh"))
            .and(body_string_contains("client_id=client-1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "access_token": "access-1" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/users/reports@acme.dev/sendMail"))
            .and(header("authorization", "Bearer access-1"))
            .and(body_partial_json(json!({
                "message": {
                    "subject": "March report",
                    "body": { "contentType": "Text", "content": "# Report" }
                }
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let service = MailService::from_config(&config_for(&server));
        service
            .deliver(&credentials(), "March report", "# Report")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_authentication_failure_propagates() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/users/reports@acme.dev/sendMail"))
            .respond_with(ResponseTemplate::new(202))
            .expect(0)
            .mount(&server)
            .await;

        let service = MailService::from_config(&config_for(&server));
        let err = service
            .deliver(&credentials(), "subject", "body")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("400"));
    }

    #[tokio::test]
    async fn test_connect_requires_recipients() {
        let server = MockServer::start().await;
        let mut config = config_for(&server);
        config.recipients.clear();

        let result = MailTransport::connect(&Client::new(), &config, &credentials()).await;
        assert!(result.is_err());
    }
}
