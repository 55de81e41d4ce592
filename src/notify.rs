//! Daily-readings push notification sender.
//!
//! One fire-and-forget FCM send to the `daily_readings` topic. Credentials
//! arrive as a JSON blob in the `FCM_CREDENTIALS` environment variable
//! (project id plus a short-lived bearer token minted by CI); a missing or
//! malformed blob fails the run before any network call. No retry: delivery
//! either acknowledges or the process exits non-zero.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use tracing::{info, instrument};

/// Environment variable holding the credential blob.
pub const CREDENTIALS_ENV: &str = "FCM_CREDENTIALS";

/// Parsed push-delivery credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct PushCredentials {
    pub project_id: String,
    pub access_token: String,
}

impl PushCredentials {
    /// Parse and validate the credential blob.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let credentials: PushCredentials =
            serde_json::from_str(raw).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        if credentials.project_id.is_empty() {
            return Err(ConfigError::Malformed("project_id is empty".to_string()));
        }
        if credentials.access_token.is_empty() {
            return Err(ConfigError::Malformed("access_token is empty".to_string()));
        }
        Ok(credentials)
    }
}

/// Credential configuration failure; fatal before any delivery attempt.
#[derive(Debug)]
pub enum ConfigError {
    /// The environment variable is not set.
    Missing(&'static str),
    /// The blob is not valid credential JSON.
    Malformed(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "missing credential environment variable {var}"),
            ConfigError::Malformed(reason) => write!(f, "malformed credentials: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Load credentials from the environment.
pub fn load_credentials() -> Result<PushCredentials, ConfigError> {
    let raw = std::env::var(CREDENTIALS_ENV).map_err(|_| ConfigError::Missing(CREDENTIALS_ENV))?;
    PushCredentials::from_json(&raw)
}

/// The FCM send request body.
#[derive(Debug, Clone, Serialize)]
pub struct PushMessage {
    pub message: Message,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub notification: Notification,
    /// Delivered to the app's intent extras when it is backgrounded; the
    /// client uses it for deep-link routing.
    pub data: MessageData,
    pub topic: String,
    pub android: Android,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageData {
    #[serde(rename = "NAVIGATE_TO")]
    pub navigate_to: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Android {
    pub notification: AndroidNotification,
}

#[derive(Debug, Clone, Serialize)]
pub struct AndroidNotification {
    /// Deep link the OS may handle directly.
    pub link: String,
    pub priority: String,
}

/// The fixed daily-readings payload.
pub fn daily_readings_message() -> PushMessage {
    PushMessage {
        message: Message {
            notification: Notification {
                title: "🕊️ A Moment of Peace".to_string(),
                body: "Your daily reading is ready. Take a moment for your soul today."
                    .to_string(),
            },
            data: MessageData {
                navigate_to: "daily-readings".to_string(),
            },
            topic: "daily_readings".to_string(),
            android: Android {
                notification: AndroidNotification {
                    link: "saints://daily-readings".to_string(),
                    priority: "high".to_string(),
                },
            },
        },
    }
}

/// Submit the message to FCM. One attempt, no retry.
#[instrument(level = "info", skip_all, fields(topic = %message.message.topic))]
pub async fn send(
    client: &reqwest::Client,
    credentials: &PushCredentials,
    message: &PushMessage,
) -> Result<(), Box<dyn Error>> {
    let endpoint = format!(
        "https://fcm.googleapis.com/v1/projects/{}/messages:send",
        credentials.project_id
    );

    let response = client
        .post(&endpoint)
        .bearer_auth(&credentials.access_token)
        .json(message)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(format!("push delivery failed: HTTP {status}: {body}").into());
    }

    info!("Notification delivered");
    Ok(())
}
