//! Delivery channel doubles.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{DeliveryChannel, DeliveryError, DeliveryReceipt, OutboundMessage};

/// Records every message and fails for configured recipients.
#[derive(Default)]
pub struct RecordingDeliveryChannel {
    sent: Mutex<Vec<OutboundMessage>>,
    failing_recipients: Mutex<HashSet<String>>,
}

impl RecordingDeliveryChannel {
    /// Make every send to `recipient` fail with a transport error.
    pub fn fail_for(&self, recipient: &str) {
        lock(&self.failing_recipients).insert(recipient.to_owned());
    }

    /// Messages offered to the channel, in call order.
    pub fn messages(&self) -> Vec<OutboundMessage> {
        lock(&self.sent).clone()
    }
}

#[async_trait]
impl DeliveryChannel for RecordingDeliveryChannel {
    async fn send(&self, message: &OutboundMessage) -> Result<DeliveryReceipt, DeliveryError> {
        lock(&self.sent).push(message.clone());
        if lock(&self.failing_recipients).contains(message.recipient.as_str()) {
            return Err(DeliveryError::transport("connection reset"));
        }
        Ok(DeliveryReceipt::Delivered)
    }
}

/// Never completes a send; used to exercise delivery timeouts.
#[derive(Debug, Default, Clone, Copy)]
pub struct StalledDeliveryChannel;

#[async_trait]
impl DeliveryChannel for StalledDeliveryChannel {
    async fn send(&self, _message: &OutboundMessage) -> Result<DeliveryReceipt, DeliveryError> {
        std::future::pending().await
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("delivery double mutex"),
    }
}
