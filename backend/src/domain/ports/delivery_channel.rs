//! Driven port for the outward reminder transport.
//!
//! The domain owns the message shape; adapters decide how it reaches the
//! recipient. Implementations must report failures as values rather than
//! panicking so one failed reminder never aborts a scan.

use async_trait::async_trait;

use crate::domain::EmailAddress;

use super::define_port_error;

/// One outbound reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Recipient address.
    pub recipient: EmailAddress,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// How a successful send was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryReceipt {
    /// The transport accepted the message.
    Delivered,
    /// No transport is configured; the send was simulated and treated as
    /// success.
    Simulated,
}

define_port_error! {
    /// Errors surfaced while delivering a reminder.
    pub enum DeliveryError {
        /// The transport failed before a response was received.
        Transport { message: String } =>
            "delivery transport failed: {message}",
        /// The transport answered but refused the message.
        Rejected { status: u16, message: String } =>
            "delivery rejected with status {status}: {message}",
        /// The send exceeded its time budget.
        Timeout { seconds: u64 } =>
            "delivery timed out after {seconds}s",
    }
}

/// Port for sending reminder messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Send one message.
    async fn send(&self, message: &OutboundMessage) -> Result<DeliveryReceipt, DeliveryError>;
}
