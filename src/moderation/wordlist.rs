// Word-list moderator.
//
// Matches whole words, case-insensitively, so "class" does not trip on
// "ass". Words are escaped before they go into the pattern. A `\b` only
// works next to a word character, so a term that starts or ends with
// punctuation ("c++", "@ss") is guarded by a non-word character or the
// edge of the text on that side instead.

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex_lite::Regex;
use tracing::debug;

use super::traits::ContentModerator;

pub struct WordListModerator {
    pattern: Regex,
}

impl WordListModerator {
    pub fn new(words: &[String]) -> Result<Self> {
        if words.is_empty() {
            anyhow::bail!("WordListModerator needs at least one word");
        }

        let alternatives: Vec<String> = words.iter().map(|w| whole_word(w)).collect();
        let pattern = format!("(?i){}", alternatives.join("|"));
        let pattern = Regex::new(&pattern).context("Failed to compile moderation word list")?;

        Ok(Self { pattern })
    }
}

fn whole_word(word: &str) -> String {
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    let start = if word.starts_with(is_word) { r"\b" } else { r"(?:^|\W)" };
    let end = if word.ends_with(is_word) { r"\b" } else { r"(?:\W|$)" };
    format!("{start}(?:{}){end}", regex_lite::escape(word))
}

#[async_trait]
impl ContentModerator for WordListModerator {
    async fn is_flagged(&self, text: &str) -> Result<bool> {
        let flagged = self.pattern.is_match(text);
        if flagged {
            debug!("Submission matched the moderation word list");
        }
        Ok(flagged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moderator(words: &[&str]) -> WordListModerator {
        let words: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        WordListModerator::new(&words).unwrap()
    }

    #[tokio::test]
    async fn test_matches_whole_word_case_insensitive() {
        let m = moderator(&["spam"]);
        assert!(m.is_flagged("Buy SPAM now").await.unwrap());
        assert!(m.is_flagged("spam").await.unwrap());
    }

    #[tokio::test]
    async fn test_ignores_substrings() {
        let m = moderator(&["ass"]);
        assert!(!m.is_flagged("first class service").await.unwrap());
    }

    #[tokio::test]
    async fn test_escapes_metacharacters() {
        let m = moderator(&["c++"]);
        assert!(!m.is_flagged("cccc").await.unwrap());
    }

    #[tokio::test]
    async fn test_matches_terms_with_punctuation_edges() {
        let m = moderator(&["c++", "@ss"]);
        assert!(m.is_flagged("I love c++").await.unwrap());
        assert!(m.is_flagged("c++ is fine").await.unwrap());
        assert!(m.is_flagged("you @ss!").await.unwrap());
        assert!(m.is_flagged("@SS").await.unwrap());
        assert!(!m.is_flagged("x@ss").await.unwrap());
        assert!(!m.is_flagged("abc++").await.unwrap());
    }

    #[tokio::test]
    async fn test_matches_any_listed_word() {
        let m = moderator(&["spam", "c++"]);
        assert!(m.is_flagged("some spam").await.unwrap());
        assert!(m.is_flagged("some c++").await.unwrap());
        assert!(!m.is_flagged("some rust").await.unwrap());
    }

    #[test]
    fn test_empty_list_is_rejected() {
        assert!(WordListModerator::new(&[]).is_err());
    }
}
