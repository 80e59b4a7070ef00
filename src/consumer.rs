//! NATS message consumer for incoming score requests

use anyhow::Result;
use async_nats::{Client, Subscriber};
use tracing::info;

/// Consumer for receiving account score requests from NATS.
///
/// When a queue group is set, multiple scoring-service instances share the
/// subject and each request is delivered to exactly one of them.
pub struct AccountConsumer {
    client: Client,
    subject: String,
    queue_group: Option<String>,
}

impl AccountConsumer {
    /// Create a new account consumer
    pub fn new(client: Client, subject: &str, queue_group: Option<String>) -> Self {
        Self {
            client,
            subject: subject.to_string(),
            queue_group,
        }
    }

    /// Subscribe to the account subject, joining the queue group if one is
    /// configured.
    pub async fn subscribe(&self) -> Result<Subscriber> {
        let subscriber = match &self.queue_group {
            Some(group) => {
                self.client
                    .queue_subscribe(self.subject.clone(), group.clone())
                    .await?
            }
            None => self.client.subscribe(self.subject.clone()).await?,
        };

        info!(
            subject = %self.subject,
            queue_group = self.queue_group.as_deref().unwrap_or("none"),
            "Subscribed to account subject"
        );
        Ok(subscriber)
    }

    /// Get the subject name
    pub fn subject(&self) -> &str {
        &self.subject
    }
}
