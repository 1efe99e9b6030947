//! Wire shape of a relay submission.

use serde::Serialize;

use crate::domain::ports::OutboundMessage;

#[derive(Debug, Serialize)]
pub(super) struct RelayMessageDto<'a> {
    pub(super) from: &'a str,
    pub(super) to: &'a str,
    pub(super) subject: &'a str,
    pub(super) text: &'a str,
}

impl<'a> RelayMessageDto<'a> {
    pub(super) fn new(sender: &'a str, message: &'a OutboundMessage) -> Self {
        Self {
            from: sender,
            to: message.recipient.as_str(),
            subject: message.subject.as_str(),
            text: message.body.as_str(),
        }
    }
}
