//! Push notification dispatch
//!
//! Pushover is a fire-and-forget sink: a failed send is logged and counted by
//! the caller, never propagated into the polling loop.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

const PUSHOVER_URL: &str = "https://api.pushover.net/1/messages.json";

/// Sends must complete well inside one poll interval
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound notification sink
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, title: &str, message: &str) -> Result<()>;
}

/// Pushover API client
pub struct PushoverNotifier {
    client: reqwest::Client,
    token: String,
    user: String,
    priority: i8,
    sound: String,
}

impl PushoverNotifier {
    pub fn new(token: String, user: String, priority: i8, sound: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .context("build notification HTTP client")?;
        Ok(Self {
            client,
            token,
            user,
            priority,
            sound,
        })
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    async fn send(&self, title: &str, message: &str) -> Result<()> {
        let priority = self.priority.to_string();
        let form = [
            ("token", self.token.as_str()),
            ("user", self.user.as_str()),
            ("title", title),
            ("message", message),
            ("priority", priority.as_str()),
            ("sound", self.sound.as_str()),
        ];

        self.client
            .post(PUSHOVER_URL)
            .form(&form)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .context("POST pushover message")?;

        Ok(())
    }
}

/// No-op sink used when notifications are disabled in config
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn send(&self, _title: &str, _message: &str) -> Result<()> {
        Ok(())
    }
}
