//! Outgoing e-mail notifications.
//!
//! Handlers never wait on mail delivery: [`dispatch`] hands the message to a
//! spawned task and only logs the outcome.

// region:    --- Imports
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

// endregion: --- Imports

pub const DEFAULT_MAILGUN_BASE_URL: &str = "https://api.mailgun.net/v3";

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("mail request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("mail provider answered {0}")]
    Rejected(reqwest::StatusCode),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotificationError>;
}

/// Send without blocking the caller
pub fn dispatch(notifier: Arc<dyn Notifier>, to: String, subject: String, body: String) {
    tokio::spawn(async move {
        match notifier.send(&to, &subject, &body).await {
            Ok(()) => info!("{:<12} --> sent '{}' to {}", "Notify", subject, to),
            Err(e) => error!("{:<12} --> failed to notify {}: {}", "Notify", to, e),
        }
    });
}

// region:    --- Mailgun

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailgunConfig {
    pub domain: String,
    pub api_key: String,
    pub from: String,
    pub base_url: String,
}

pub struct MailgunNotifier {
    client: reqwest::Client,
    config: MailgunConfig,
}

impl MailgunNotifier {
    pub fn new(config: MailgunConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/{}/messages",
            self.config.base_url.trim_end_matches('/'),
            self.config.domain
        )
    }
}

#[async_trait]
impl Notifier for MailgunNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth("api", Some(&self.config.api_key))
            .form(&[
                ("from", self.config.from.as_str()),
                ("to", to),
                ("subject", subject),
                ("text", body),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotificationError::Rejected(response.status()));
        }
        Ok(())
    }
}

// endregion: --- Mailgun

// region:    --- Log only

/// Stand-in when no mail provider is configured
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotificationError> {
        info!(
            "{:<12} --> (mail disabled) to: {}, subject: {}, body: {}",
            "Notify", to, subject, body
        );
        Ok(())
    }
}

// endregion: --- Log only

pub fn from_config(mailgun: Option<MailgunConfig>) -> Arc<dyn Notifier> {
    match mailgun {
        Some(config) => {
            info!("{:<12} --> Mailgun domain {}", "Notify", config.domain);
            Arc::new(MailgunNotifier::new(config))
        }
        None => Arc::new(LogNotifier),
    }
}

// region:    --- Tests


// endregion: --- Tests
