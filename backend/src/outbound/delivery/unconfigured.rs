//! Stand-in channel used when no relay is configured.

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{DeliveryChannel, DeliveryError, DeliveryReceipt, OutboundMessage};

/// Reports every send as a simulated success and logs a warning.
///
/// Scans therefore still write `Sent` log entries, matching deployments that
/// run without outward delivery.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredDeliveryChannel;

#[async_trait]
impl DeliveryChannel for UnconfiguredDeliveryChannel {
    async fn send(&self, message: &OutboundMessage) -> Result<DeliveryReceipt, DeliveryError> {
        warn!(
            recipient = message.recipient.as_str(),
            subject = message.subject.as_str(),
            "delivery channel not configured; reminder not sent"
        );
        Ok(DeliveryReceipt::Simulated)
    }
}
