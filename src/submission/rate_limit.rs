// Client-side submission throttle.
//
// One timestamp (milliseconds since the epoch) is kept in the state store
// under LAST_SUBMISSION_KEY. A new submission on the primary path is refused
// while fewer than `window_ms` milliseconds have passed since that timestamp.
// The timestamp only moves after a confirmed send.

use anyhow::Result;
use tracing::{debug, warn};

use crate::db::StateStore;

/// State store key holding the last confirmed submission time.
pub const LAST_SUBMISSION_KEY: &str = "last_form_submission";

/// Minimum time between submissions.
pub const DEFAULT_WINDOW_MS: i64 = 60_000;

/// Fixed-window throttle over a single stored timestamp.
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    window_ms: i64,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_MS)
    }
}

impl RateLimiter {
    pub fn new(window_ms: i64) -> Self {
        Self { window_ms }
    }

    pub fn window_ms(&self) -> i64 {
        self.window_ms
    }

    /// True when a submission at `now_ms` falls inside the window.
    pub fn is_limited(&self, last_ms: Option<i64>, now_ms: i64) -> bool {
        match last_ms {
            Some(last) => now_ms.saturating_sub(last) < self.window_ms,
            None => false,
        }
    }

    /// Milliseconds until the next submission is allowed (0 if allowed now).
    pub fn remaining_ms(&self, last_ms: Option<i64>, now_ms: i64) -> i64 {
        match last_ms {
            Some(last) => self
                .window_ms
                .saturating_sub(now_ms.saturating_sub(last))
                .clamp(0, self.window_ms),
            None => 0,
        }
    }
}

/// Parse a stored timestamp. Anything that isn't an integer counts as
/// "no previous submission".
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(ms) => Some(ms),
        Err(_) => {
            warn!(value = raw, "Ignoring unparseable rate-limit timestamp");
            None
        }
    }
}

/// Read the last confirmed submission time from the store.
pub async fn last_submission(store: &dyn StateStore) -> Result<Option<i64>> {
    let raw = store.get_state(LAST_SUBMISSION_KEY).await?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

/// Record a confirmed submission at `now_ms`.
pub async fn record_submission(store: &dyn StateStore, now_ms: i64) -> Result<()> {
    debug!(at = now_ms, "Recording submission time");
    store
        .set_state(LAST_SUBMISSION_KEY, &now_ms.to_string())
        .await
}
