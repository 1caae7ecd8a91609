//! Outbound notifiers behind the dispatcher queue.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::info;

use hotelier_core::config::{AppConfig, NotificationMode};
use hotelier_core::notify::{EmailMessage, NotificationEvent, Notifier, NotifyError};

const WEBHOOK_TIMEOUT_SECS: u64 = 10;

/// Writes each outgoing email as a structured log line instead of sending it.
pub struct LogNotifier {
    hotel_name: String,
    manager_email: String,
}

impl LogNotifier {
    pub fn new(hotel_name: impl Into<String>, manager_email: impl Into<String>) -> Self {
        Self { hotel_name: hotel_name.into(), manager_email: manager_email.into() }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn deliver(&self, event: &NotificationEvent) -> Result<(), NotifyError> {
        for message in EmailMessage::for_event(event, &self.hotel_name, &self.manager_email) {
            info!(
                event_name = "notification.email_logged",
                notification = event.name(),
                to = %message.to,
                subject = %message.subject,
                body = %message.body,
                "email (log mode)"
            );
        }
        Ok(())
    }
}

/// POSTs the event and its rendered emails as JSON.
pub struct WebhookNotifier {
    client: Client,
    url: String,
    secret: Option<SecretString>,
    hotel_name: String,
    manager_email: String,
}

impl WebhookNotifier {
    pub fn new(
        url: impl Into<String>,
        secret: Option<SecretString>,
        hotel_name: impl Into<String>,
        manager_email: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .build()
            .map_err(|error| NotifyError::Transport(error.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            secret,
            hotel_name: hotel_name.into(),
            manager_email: manager_email.into(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn deliver(&self, event: &NotificationEvent) -> Result<(), NotifyError> {
        let payload = json!({
            "hotel": self.hotel_name,
            "notification": event,
            "emails": EmailMessage::for_event(event, &self.hotel_name, &self.manager_email),
        });

        let mut request = self.client.post(&self.url).json(&payload);
        if let Some(secret) = &self.secret {
            request = request.bearer_auth(secret.expose_secret());
        }

        let response =
            request.send().await.map_err(|error| NotifyError::Transport(error.to_string()))?;
        if !response.status().is_success() {
            return Err(NotifyError::Rejected { status: response.status().as_u16() });
        }
        Ok(())
    }
}

pub fn from_config(config: &AppConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    let notifications = &config.notifications;
    match notifications.mode {
        NotificationMode::Log => Ok(Arc::new(LogNotifier::new(
            config.hotel.name.clone(),
            notifications.manager_email.clone(),
        ))),
        NotificationMode::Webhook => {
            let url = notifications
                .webhook_url
                .clone()
                .ok_or_else(|| NotifyError::Transport("webhook url is not configured".to_string()))?;
            Ok(Arc::new(WebhookNotifier::new(
                url,
                notifications.webhook_secret.clone(),
                config.hotel.name.clone(),
                notifications.manager_email.clone(),
            )?))
        }
    }
}
