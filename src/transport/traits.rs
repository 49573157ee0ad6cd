// Transport trait and its error type.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::submission::{Channel, Submission};

/// Why a delivery attempt failed. Every variant sends the controller to
/// the fallback (if any) and is otherwise terminal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The service answered, but not with its success status.
    #[error("{service} returned HTTP {status}: {message}")]
    Rejected {
        service: &'static str,
        status: u16,
        message: String,
    },
    /// The request could not be put together (bad URL, template failure).
    #[error("{service} request could not be built: {detail}")]
    Build {
        service: &'static str,
        detail: String,
    },
    /// The request never got a response (DNS, TLS, connection, timeout).
    #[error("{service} request failed: {detail}")]
    Network {
        service: &'static str,
        detail: String,
    },
}

impl TransportError {
    pub fn build(service: &'static str, err: impl std::fmt::Display) -> Self {
        TransportError::Build {
            service,
            detail: err.to_string(),
        }
    }

    pub fn network(service: &'static str, err: impl std::fmt::Display) -> Self {
        TransportError::Network {
            service,
            detail: err.to_string(),
        }
    }
}

/// One way of delivering a submission.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Which channel a success is reported under.
    fn channel(&self) -> Channel;

    /// Deliver the submission. `now` stamps any timestamp in the payload.
    async fn deliver(&self, submission: &Submission, now: DateTime<Utc>)
        -> Result<(), TransportError>;
}
