//! Reqwest-backed e-mail relay adapter.
//!
//! Owns transport details only: JSON serialisation, the per-request timeout
//! and mapping of HTTP failures to [`DeliveryError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::RelayMessageDto;
use crate::domain::EmailAddress;
use crate::domain::ports::{DeliveryChannel, DeliveryError, DeliveryReceipt, OutboundMessage};

const DEFAULT_USER_AGENT: &str = "immunisation-reminders/0.1";

/// Sender identity presented to the relay.
pub struct RelayIdentity {
    /// `From` address on every reminder.
    pub sender: EmailAddress,
    /// HTTP user-agent.
    pub user_agent: String,
}

impl RelayIdentity {
    pub fn new(sender: EmailAddress) -> Self {
        Self {
            sender,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

/// Delivery channel that POSTs each reminder to one relay endpoint.
pub struct HttpRelayDeliveryChannel {
    client: Client,
    endpoint: Url,
    sender: EmailAddress,
    user_agent: String,
    timeout: Duration,
}

impl HttpRelayDeliveryChannel {
    /// Build the adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        identity: RelayIdentity,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            sender: identity.sender,
            user_agent: identity.user_agent,
            timeout,
        })
    }

    fn map_transport_error(&self, error: reqwest::Error) -> DeliveryError {
        if error.is_timeout() {
            DeliveryError::timeout(self.timeout.as_secs())
        } else {
            DeliveryError::transport(error.to_string())
        }
    }
}

#[async_trait]
impl DeliveryChannel for HttpRelayDeliveryChannel {
    async fn send(&self, message: &OutboundMessage) -> Result<DeliveryReceipt, DeliveryError> {
        let payload = RelayMessageDto::new(self.sender.as_str(), message);
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(|err| self.map_transport_error(err))?;

        let status = response.status();
        if status.is_success() {
            return Ok(DeliveryReceipt::Delivered);
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| self.map_transport_error(err))?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> DeliveryError {
    let preview = body_preview(body);
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            DeliveryError::transport(format!("relay timed out with status {}", status.as_u16()))
        }
        _ => DeliveryError::rejected(status.as_u16(), preview),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if compact.is_empty() {
        return "no response body".to_owned();
    }
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the non-network mapping helpers.

    use rstest::rstest;

    use super::*;

    fn message() -> OutboundMessage {
        OutboundMessage {
            recipient: EmailAddress::new("parent@example.org").expect("valid email"),
            subject: "Vaccination Reminder".to_owned(),
            body: "Reminder: Asha is due".to_owned(),
        }
    }

    #[rstest]
    fn payload_carries_sender_and_message() {
        let message = message();
        let payload = RelayMessageDto::new("clinic@example.org", &message);
        let json = serde_json::to_value(&payload).expect("serialise");

        assert_eq!(json["from"], "clinic@example.org");
        assert_eq!(json["to"], "parent@example.org");
        assert_eq!(json["subject"], "Vaccination Reminder");
        assert_eq!(json["text"], "Reminder: Asha is due");
    }

    #[rstest]
    #[case(StatusCode::UNPROCESSABLE_ENTITY, "rejected")]
    #[case(StatusCode::SERVICE_UNAVAILABLE, "rejected")]
    #[case(StatusCode::GATEWAY_TIMEOUT, "transport")]
    fn maps_statuses(#[case] status: StatusCode, #[case] kind: &str) {
        let error = map_status_error(status, b"{\"error\":\"bad recipient\"}");
        assert_eq!(error.kind(), kind);
    }

    #[rstest]
    fn rejection_keeps_status_and_compact_body() {
        let error = map_status_error(StatusCode::BAD_REQUEST, b"  invalid \n address ");
        assert_eq!(error, DeliveryError::rejected(400_u16, "invalid address"));
    }

    #[rstest]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(500);
        let preview = body_preview(body.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }
}
