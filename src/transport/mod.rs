// Delivery transports — the primary email API and the fallback dispatch API.
//
// Both implement the Transport trait so the controller can chain them as
// a Result: the fallback only runs on the primary's error variant.

pub mod dispatch;
pub mod email;
pub mod traits;

pub use dispatch::DispatchClient;
pub use email::{EmailClient, Envelope};
pub use traits::{Transport, TransportError};

use anyhow::Result;

use crate::config::TransportConfig;

/// Built clients, in the same shape as the credentials they came from.
pub type Transports = TransportConfig<Box<dyn Transport>, Box<dyn Transport>>;

/// User agent for both clients. GitHub rejects requests without one.
pub const USER_AGENT: &str = concat!("contact-relay/", env!("CARGO_PKG_VERSION"));

/// Build an HTTP client for every configured transport.
pub fn build(config: &TransportConfig, envelope: Envelope) -> Result<Transports> {
    config.try_map(
        |primary| {
            Ok::<_, anyhow::Error>(Box::new(EmailClient::new(primary, envelope)?) as Box<dyn Transport>)
        },
        |fallback| Ok(Box::new(DispatchClient::new(fallback)?) as Box<dyn Transport>),
    )
}
