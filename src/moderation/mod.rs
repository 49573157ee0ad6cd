// Content moderation — trait-based predicate for swappable checkers.
//
// The ContentModerator trait is the injection point. NoopModerator never
// matches and is the default; WordListModerator blocks configured words.
// A hosted classifier can be dropped in later without touching the
// controller.

pub mod traits;
pub mod wordlist;

pub use traits::{ContentModerator, NoopModerator};
pub use wordlist::WordListModerator;

/// Pick a moderator for the configured word list.
pub fn from_word_list(words: &[String]) -> anyhow::Result<Box<dyn ContentModerator>> {
    if words.is_empty() {
        Ok(Box::new(NoopModerator))
    } else {
        Ok(Box::new(WordListModerator::new(words)?))
    }
}
