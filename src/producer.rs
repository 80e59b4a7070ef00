//! NATS message producer for account verdicts

use crate::types::{AccountVerdict, ErrorPayload};
use anyhow::Result;
use async_nats::Client;
use tracing::debug;

/// Producer for publishing verdicts and failure payloads to NATS
#[derive(Clone)]
pub struct VerdictProducer {
    client: Client,
    subject: String,
}

impl VerdictProducer {
    /// Create a new verdict producer
    pub fn new(client: Client, subject: &str) -> Self {
        Self {
            client,
            subject: subject.to_string(),
        }
    }

    /// Publish a verdict
    pub async fn publish(&self, verdict: &AccountVerdict) -> Result<()> {
        let payload = serde_json::to_vec(verdict)?;

        self.client
            .publish(self.subject.clone(), payload.into())
            .await?;

        debug!(
            verdict_id = %verdict.verdict_id,
            is_fake = verdict.is_fake,
            confidence = verdict.confidence,
            "Published verdict"
        );

        Ok(())
    }

    /// Publish a structured failure payload. Callers never receive partial
    /// result fields on failure.
    pub async fn publish_error(&self, error: &ErrorPayload) -> Result<()> {
        let payload = serde_json::to_vec(error)?;

        self.client
            .publish(self.subject.clone(), payload.into())
            .await?;

        debug!(error = %error.error, "Published failure payload");

        Ok(())
    }

    /// Get the subject name
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

#[cfg(test)]
mod tests {
    // Integration tests would require a running NATS server
}
