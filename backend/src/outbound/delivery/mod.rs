//! Delivery channel adapters.
//!
//! `HttpRelayDeliveryChannel` posts reminders to an e-mail relay; the
//! `UnconfiguredDeliveryChannel` stands in when no relay is configured and
//! reports every send as a simulated success.

mod dto;
mod http_relay;
mod unconfigured;

pub use http_relay::{HttpRelayDeliveryChannel, RelayIdentity};
pub use unconfigured::UnconfiguredDeliveryChannel;
