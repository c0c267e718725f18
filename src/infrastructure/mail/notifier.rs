use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use derive_more::Display;
use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

use crate::settings::AppConfig;

const MAIL_API_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, Display)]
pub enum NotifyError {
    #[display("Mail transport failed: {_0}")]
    Transport(String),
    #[display("Mail API rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[display("Mail delivery is not configured")]
    NotConfigured,
}

impl std::error::Error for NotifyError {}

/// Sends transactional email.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), NotifyError>;

    /// Whether `send` can deliver at all.
    fn is_configured(&self) -> bool;
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), NotifyError> {
        (**self).send(email).await
    }

    fn is_configured(&self) -> bool {
        (**self).is_configured()
    }
}

#[derive(Serialize)]
struct MailApiRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Delivers through an HTTP JSON mail API authenticated with a bearer key.
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(api_url: String, api_key: String, from: String) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(MAIL_API_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        Ok(HttpMailer { client, api_url, api_key, from })
    }
}

#[async_trait]
impl Notifier for HttpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), NotifyError> {
        let payload = MailApiRequest {
            from: &self.from,
            to: [&email.to],
            subject: &email.subject,
            html: &email.html_body,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected { status: status.as_u16(), body });
        }

        info!(subject = %email.subject, "Email sent");
        Ok(())
    }

    fn is_configured(&self) -> bool {
        true
    }
}

/// Stand-in used when no mail API is configured. Every send fails.
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send(&self, _email: &OutgoingEmail) -> Result<(), NotifyError> {
        Err(NotifyError::NotConfigured)
    }

    fn is_configured(&self) -> bool {
        false
    }
}

pub fn build_notifier(config: &AppConfig) -> Arc<dyn Notifier> {
    let (Some(url), Some(key), Some(from)) = (
        config.mail_api_url.clone(),
        config.mail_api_key.clone(),
        config.mail_from.clone(),
    ) else {
        warn!("Mail API is not configured; contact notifications and replies are disabled");
        return Arc::new(DisabledNotifier);
    };

    match HttpMailer::new(url, key, from) {
        Ok(mailer) => Arc::new(mailer),
        Err(e) => {
            warn!("Failed to build mail client, email disabled: {}", e);
            Arc::new(DisabledNotifier)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_disables_mail() {
        let config = AppConfig {
            mail_api_url: Some("https://mail.example.com/emails".into()),
            mail_from: Some("site@example.com".into()),
            ..AppConfig::default()
        };
        assert!(!build_notifier(&config).is_configured());
    }

    #[test]
    fn complete_mail_settings_enable_mail() {
        let config = AppConfig {
            mail_api_url: Some("https://mail.example.com/emails".into()),
            mail_api_key: Some("key".into()),
            mail_from: Some("site@example.com".into()),
            ..AppConfig::default()
        };
        assert!(build_notifier(&config).is_configured());
    }

    #[tokio::test]
    async fn disabled_notifier_refuses_to_send() {
        let email = OutgoingEmail {
            to: "a@example.com".into(),
            subject: "Hi".into(),
            html_body: "<p>Hi</p>".into(),
        };
        assert!(matches!(DisabledNotifier.send(&email).await, Err(NotifyError::NotConfigured)));
    }
}
