// Submission controller — one submission in, exactly one outcome out.
//
// Order of gates:
//   1. moderation (always, before configuration is looked at)
//   2. configuration (no primary key: go straight to the fallback, or
//      report a config error when there is no fallback either)
//   3. rate limit (primary path only)
//   4. primary transport, then the fallback on any primary error
//
// `decide` covers 1–3 and is pure. `SubmissionController` reads the state
// store, runs the transports, and records the timestamp after a send.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::models::{Channel, Submission, SubmissionOutcome};
use super::rate_limit::{self, RateLimiter};
use crate::config::TransportConfig;
use crate::db::StateStore;
use crate::moderation::ContentModerator;
use crate::transport::{Transport, TransportError, Transports};

/// Which transports to try, borrowed from the configuration.
#[derive(Debug)]
pub enum Route<'t, P, F> {
    /// Primary first; the fallback (if any) only on primary failure.
    Primary {
        primary: &'t P,
        fallback: Option<&'t F>,
    },
    /// No primary key: fallback only, rate limit not consulted.
    Fallback(&'t F),
}

#[derive(Debug)]
pub enum Decision<'t, P, F> {
    /// Terminal before any network call.
    Finish(SubmissionOutcome),
    Deliver(Route<'t, P, F>),
}

/// Run the pre-transport gates.
///
/// `last_ms` is only consulted on the primary path; callers may pass `None`
/// when there is no primary.
pub fn decide<'t, P, F>(
    flagged: bool,
    transports: &'t TransportConfig<P, F>,
    last_ms: Option<i64>,
    now_ms: i64,
    limiter: &RateLimiter,
) -> Decision<'t, P, F> {
    if flagged {
        return Decision::Finish(SubmissionOutcome::Blocked);
    }

    match transports {
        TransportConfig::Unconfigured => Decision::Finish(SubmissionOutcome::ConfigError),
        TransportConfig::FallbackOnly { fallback } => Decision::Deliver(Route::Fallback(fallback)),
        TransportConfig::FullyConfigured { primary, fallback } => {
            if limiter.is_limited(last_ms, now_ms) {
                Decision::Finish(SubmissionOutcome::RateLimited)
            } else {
                Decision::Deliver(Route::Primary {
                    primary,
                    fallback: fallback.as_ref(),
                })
            }
        }
    }
}

pub struct SubmissionController {
    transports: Transports,
    moderator: Box<dyn ContentModerator>,
    store: Arc<dyn StateStore>,
    limiter: RateLimiter,
}

impl SubmissionController {
    pub fn new(
        transports: Transports,
        moderator: Box<dyn ContentModerator>,
        store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            transports,
            moderator,
            store,
            limiter: RateLimiter::default(),
        }
    }

    pub fn with_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn transports(&self) -> &Transports {
        &self.transports
    }

    /// Handle one submission. Never fails: errors that escape the gates
    /// (moderator or state store failures) become a network-error outcome.
    pub async fn submit(&self, submission: &Submission, now: DateTime<Utc>) -> SubmissionOutcome {
        let outcome = match self.run(submission, now).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Contact form error");
                SubmissionOutcome::TransportError("network".to_string())
            }
        };

        info!(outcome = outcome.label(), "Submission finished");
        outcome
    }

    async fn run(&self, submission: &Submission, now: DateTime<Utc>) -> Result<SubmissionOutcome> {
        let flagged = self
            .moderator
            .is_flagged(&submission.moderation_text())
            .await?;

        let now_ms = now.timestamp_millis();
        let last_ms = if !flagged && self.transports.primary().is_some() {
            rate_limit::last_submission(self.store.as_ref()).await?
        } else {
            None
        };

        let route = match decide(flagged, &self.transports, last_ms, now_ms, &self.limiter) {
            Decision::Finish(outcome) => return Ok(outcome),
            Decision::Deliver(route) => route,
        };

        match deliver(route, submission, now).await {
            Ok(channel) => {
                // A failed write only weakens the throttle; the message is out.
                if let Err(e) = rate_limit::record_submission(self.store.as_ref(), now_ms).await {
                    warn!(error = %e, "Failed to record submission time");
                }
                Ok(SubmissionOutcome::Sent(channel))
            }
            Err(e) => {
                warn!(error = %e, "Delivery failed");
                Ok(SubmissionOutcome::TransportError(e.to_string()))
            }
        }
    }
}

/// Primary, then fallback on the primary's error variant.
async fn deliver(
    route: Route<'_, Box<dyn Transport>, Box<dyn Transport>>,
    submission: &Submission,
    now: DateTime<Utc>,
) -> Result<Channel, TransportError> {
    match route {
        Route::Fallback(fallback) => {
            debug!("No primary key configured, using fallback transport");
            attempt(&**fallback, submission, now).await
        }
        Route::Primary { primary, fallback } => {
            match attempt(&**primary, submission, now).await {
                Ok(channel) => Ok(channel),
                Err(e) => match fallback {
                    Some(fallback) => {
                        warn!(error = %e, "Primary transport failed, trying fallback");
                        attempt(&**fallback, submission, now).await
                    }
                    None => Err(e),
                },
            }
        }
    }
}

async fn attempt(
    transport: &dyn Transport,
    submission: &Submission,
    now: DateTime<Utc>,
) -> Result<Channel, TransportError> {
    let channel = transport.channel();
    debug!(channel = channel.as_str(), "Attempting delivery");
    transport.deliver(submission, now).await.map(|()| channel)
}

#[cfg(test)]
mod tests {
    use super::*;

    type Shape = TransportConfig<&'static str, &'static str>;

    const NOW: i64 = 1_700_000_100_000;

    fn full() -> Shape {
        TransportConfig::FullyConfigured {
            primary: "email",
            fallback: Some("dispatch"),
        }
    }

    #[test]
    fn test_flagged_blocks_regardless_of_config() {
        let limiter = RateLimiter::default();
        for shape in [full(), TransportConfig::Unconfigured] {
            let decision = decide(true, &shape, None, NOW, &limiter);
            assert!(matches!(
                decision,
                Decision::Finish(SubmissionOutcome::Blocked)
            ));
        }
    }

    #[test]
    fn test_unconfigured_is_config_error() {
        let shape: Shape = TransportConfig::Unconfigured;
        let decision = decide(false, &shape, None, NOW, &RateLimiter::default());
        assert!(matches!(
            decision,
            Decision::Finish(SubmissionOutcome::ConfigError)
        ));
    }

    #[test]
    fn test_fallback_only_ignores_rate_limit() {
        let shape: Shape = TransportConfig::FallbackOnly {
            fallback: "dispatch",
        };
        let decision = decide(false, &shape, Some(NOW - 1), NOW, &RateLimiter::default());
        assert!(matches!(
            decision,
            Decision::Deliver(Route::Fallback(&"dispatch"))
        ));
    }

    #[test]
    fn test_primary_path_is_rate_limited() {
        let shape = full();
        let decision = decide(false, &shape, Some(NOW - 59_999), NOW, &RateLimiter::default());
        assert!(matches!(
            decision,
            Decision::Finish(SubmissionOutcome::RateLimited)
        ));
    }

    #[test]
    fn test_primary_path_after_window() {
        let shape = full();
        let decision = decide(false, &shape, Some(NOW - 60_000), NOW, &RateLimiter::default());
        match decision {
            Decision::Deliver(Route::Primary { primary, fallback }) => {
                assert_eq!(*primary, "email");
                assert_eq!(fallback, Some(&"dispatch"));
            }
            other => panic!("expected primary route, got {other:?}"),
        }
    }
}
