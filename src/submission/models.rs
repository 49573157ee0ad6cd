// Data model for one contact form submission and its outcome.

use serde::{Deserialize, Serialize};

/// The four form values, captured at submit time and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl Submission {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Text handed to the moderator: name, subject, and message.
    /// The email address is not checked.
    pub fn moderation_text(&self) -> String {
        format!("{} {} {}", self.name, self.subject, self.message)
    }
}

/// Which transport delivered a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Primary email API
    Email,
    /// Fallback dispatch API
    Dispatch,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Dispatch => "dispatch",
        }
    }
}

/// Result of one controller invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Sent(Channel),
    /// The moderator flagged the content
    Blocked,
    /// Last submission was less than a minute ago
    RateLimited,
    /// Neither transport has credentials
    ConfigError,
    /// HTTP failure, rejected response, or network error. The detail goes
    /// to the logs; the user always sees the same network error copy.
    TransportError(String),
}

/// Color signal for the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Pending,
    Success,
    Error,
}

impl StatusTone {
    /// CSS-style color for the tone.
    pub fn hex(&self) -> &'static str {
        match self {
            StatusTone::Pending => "#00ffff",
            StatusTone::Success => "#00ff00",
            StatusTone::Error => "#800000",
        }
    }

    /// The same color as an RGB triple, for terminal rendering.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            StatusTone::Pending => (0x00, 0xff, 0xff),
            StatusTone::Success => (0x00, 0xff, 0x00),
            StatusTone::Error => (0x80, 0x00, 0x00),
        }
    }
}

pub const PENDING_MESSAGE: &str = "Sending...";

impl SubmissionOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SubmissionOutcome::Sent(_))
    }

    /// Human-readable status copy shown to the submitter.
    pub fn message(&self) -> &'static str {
        match self {
            SubmissionOutcome::Sent(Channel::Email) => {
                "Email sent successfully! Thank you for your message."
            }
            SubmissionOutcome::Sent(Channel::Dispatch) => {
                "Message received! Thank you for your submission."
            }
            SubmissionOutcome::Blocked => {
                "Message contains inappropriate content and cannot be sent."
            }
            SubmissionOutcome::RateLimited => {
                "Please wait a minute before sending another message."
            }
            SubmissionOutcome::ConfigError => {
                "Configuration error. Please contact the site administrator."
            }
            SubmissionOutcome::TransportError(_) => "Network error. Please try again later.",
        }
    }

    pub fn tone(&self) -> StatusTone {
        if self.is_sent() {
            StatusTone::Success
        } else {
            StatusTone::Error
        }
    }

    /// Short machine-friendly label, used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionOutcome::Sent(_) => "sent",
            SubmissionOutcome::Blocked => "blocked",
            SubmissionOutcome::RateLimited => "rate_limited",
            SubmissionOutcome::ConfigError => "config_error",
            SubmissionOutcome::TransportError(_) => "transport_error",
        }
    }
}
