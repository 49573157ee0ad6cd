use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Default Resend endpoint, used when RESEND_API_ENDPOINT is unset.
pub const DEFAULT_PRIMARY_ENDPOINT: &str = "https://api.resend.com/emails";

/// Default repository_dispatch endpoint for the fallback transport.
pub const DEFAULT_DISPATCH_URL: &str =
    "https://api.github.com/repos/fireemerald1/fire-exe-website.github.io/dispatches";

pub const DEFAULT_SENDER: &str = "onboarding@resend.dev";
pub const DEFAULT_RECIPIENT: &str = "fireexecontact@gmail.com";
pub const DEFAULT_ORIGIN: &str = "localhost";

/// Credentials for the primary (Resend) transport.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryCredentials {
    pub endpoint: String,
    pub api_key: String,
}

/// Credentials for the fallback (GitHub dispatch) transport.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackCredentials {
    pub token: String,
    pub dispatch_url: String,
}

/// Which transports a submission can use.
///
/// `FullyConfigured` means the primary key is present; the fallback is
/// still optional on that path. The same shape carries credentials (as
/// loaded) or built clients (see `transport::build`).
#[derive(Debug, Clone, PartialEq)]
pub enum TransportConfig<P = PrimaryCredentials, F = FallbackCredentials> {
    FullyConfigured { primary: P, fallback: Option<F> },
    FallbackOnly { fallback: F },
    Unconfigured,
}

impl TransportConfig {
    /// Build the variant from raw (possibly empty) settings.
    pub fn from_parts(
        primary_endpoint: Option<&str>,
        primary_key: Option<&str>,
        fallback_token: Option<&str>,
        dispatch_url: Option<&str>,
    ) -> Self {
        let fallback = non_empty(fallback_token).map(|token| FallbackCredentials {
            token: token.to_string(),
            dispatch_url: non_empty(dispatch_url)
                .unwrap_or(DEFAULT_DISPATCH_URL)
                .to_string(),
        });

        match (non_empty(primary_key), fallback) {
            (Some(api_key), fallback) => TransportConfig::FullyConfigured {
                primary: PrimaryCredentials {
                    endpoint: non_empty(primary_endpoint)
                        .unwrap_or(DEFAULT_PRIMARY_ENDPOINT)
                        .to_string(),
                    api_key: api_key.to_string(),
                },
                fallback,
            },
            (None, Some(fallback)) => TransportConfig::FallbackOnly { fallback },
            (None, None) => TransportConfig::Unconfigured,
        }
    }
}

impl<P, F> TransportConfig<P, F> {
    pub fn primary(&self) -> Option<&P> {
        match self {
            TransportConfig::FullyConfigured { primary, .. } => Some(primary),
            _ => None,
        }
    }

    pub fn fallback(&self) -> Option<&F> {
        match self {
            TransportConfig::FullyConfigured { fallback, .. } => fallback.as_ref(),
            TransportConfig::FallbackOnly { fallback } => Some(fallback),
            TransportConfig::Unconfigured => None,
        }
    }

    /// Short label for status output.
    pub fn describe(&self) -> &'static str {
        match self {
            TransportConfig::FullyConfigured { fallback: Some(_), .. } => {
                "primary + fallback"
            }
            TransportConfig::FullyConfigured { fallback: None, .. } => "primary only",
            TransportConfig::FallbackOnly { .. } => "fallback only",
            TransportConfig::Unconfigured => "unconfigured",
        }
    }

    /// Convert both payloads, keeping the variant.
    pub fn try_map<P2, F2, E>(
        &self,
        map_primary: impl FnOnce(&P) -> Result<P2, E>,
        map_fallback: impl FnOnce(&F) -> Result<F2, E>,
    ) -> Result<TransportConfig<P2, F2>, E> {
        Ok(match self {
            TransportConfig::FullyConfigured { primary, fallback } => {
                TransportConfig::FullyConfigured {
                    primary: map_primary(primary)?,
                    fallback: fallback.as_ref().map(map_fallback).transpose()?,
                }
            }
            TransportConfig::FallbackOnly { fallback } => TransportConfig::FallbackOnly {
                fallback: map_fallback(fallback)?,
            },
            TransportConfig::Unconfigured => TransportConfig::Unconfigured,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Central configuration loaded from environment variables.
///
/// Secrets come from env vars only. The .env file is loaded at startup
/// via dotenvy; every variable may be absent.
pub struct Config {
    pub primary_endpoint: String,
    pub primary_key: String,
    pub fallback_token: String,
    pub dispatch_url: String,
    /// Fixed sender address for the email transport
    pub sender: String,
    /// Fixed recipient address for the email transport
    pub recipient: String,
    /// Host named in the email footer
    pub origin: String,
    pub db_path: PathBuf,
    /// Words that block a submission (empty = moderation never matches)
    pub blocked_words: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let db_path = env::var("CONTACT_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_db_path());

        let blocked_words = env::var("CONTACT_BLOCKED_WORDS")
            .map(|raw| parse_word_list(&raw))
            .unwrap_or_default();

        Ok(Self {
            primary_endpoint: env::var("RESEND_API_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_PRIMARY_ENDPOINT.to_string()),
            primary_key: env::var("RESEND_API_KEY").unwrap_or_default(),
            fallback_token: env::var("GITHUB_TOKEN").unwrap_or_default(),
            dispatch_url: env::var("GITHUB_DISPATCH_URL")
                .unwrap_or_else(|_| DEFAULT_DISPATCH_URL.to_string()),
            sender: env::var("CONTACT_FROM").unwrap_or_else(|_| DEFAULT_SENDER.to_string()),
            recipient: env::var("CONTACT_TO").unwrap_or_else(|_| DEFAULT_RECIPIENT.to_string()),
            origin: env::var("CONTACT_ORIGIN").unwrap_or_else(|_| DEFAULT_ORIGIN.to_string()),
            db_path,
            blocked_words,
        })
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig::from_parts(
            Some(&self.primary_endpoint),
            Some(&self.primary_key),
            Some(&self.fallback_token),
            Some(&self.dispatch_url),
        )
    }

    pub fn db_path_display(&self) -> String {
        self.db_path.display().to_string()
    }
}

/// Default state database: `<local data dir>/contact-relay/state.db`.
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("contact-relay")
        .join("state.db")
}

/// Split a comma-separated word list, dropping blanks.
pub fn parse_word_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}
