// Moderation trait — async so hosted classifiers fit behind it.

use anyhow::Result;
use async_trait::async_trait;

/// Decides whether submitted text may be delivered.
#[async_trait]
pub trait ContentModerator: Send + Sync {
    /// True if the text contains blocked content.
    async fn is_flagged(&self, text: &str) -> Result<bool>;
}

/// Moderator that never matches.
pub struct NoopModerator;

#[async_trait]
impl ContentModerator for NoopModerator {
    async fn is_flagged(&self, _text: &str) -> Result<bool> {
        Ok(false)
    }
}
