// Primary transport: Resend-style email API.
//
// POST {endpoint} with a bearer key and a JSON body naming a fixed sender
// and recipient. The submitter's address goes in reply_to. Any 2xx is a
// success, even when the body isn't JSON.
//
// API docs: https://resend.com/docs/api-reference/emails/send-email

use anyhow::{Context, Result};
use askama::Template;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, Request, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::traits::{Transport, TransportError};
use crate::config::PrimaryCredentials;
use crate::submission::{Channel, Submission};

const SERVICE: &str = "email API";

/// Subject prefix for delivered messages.
pub const SUBJECT_PREFIX: &str = "Contact Form: ";

/// Fixed envelope details that don't come from the submitter.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub sender: String,
    pub recipient: String,
    /// Host named in the message footer
    pub origin: String,
}

pub struct EmailClient {
    client: Client,
    endpoint: String,
    api_key: String,
    envelope: Envelope,
}

impl EmailClient {
    pub fn new(credentials: &PrimaryCredentials, envelope: Envelope) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: credentials.endpoint.clone(),
            api_key: credentials.api_key.clone(),
            envelope,
        })
    }

    /// The POST this client sends for a submission.
    pub fn request(&self, submission: &Submission) -> Result<Request, TransportError> {
        let body = build_request(submission, &self.envelope)
            .map_err(|e| TransportError::build(SERVICE, format!("{e:#}")))?;

        self.client
            .post(&self.endpoint)
            .header(header::USER_AGENT, super::USER_AGENT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .build()
            .map_err(|e| TransportError::build(SERVICE, e))
    }
}

#[async_trait]
impl Transport for EmailClient {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn deliver(
        &self,
        submission: &Submission,
        _now: DateTime<Utc>,
    ) -> Result<(), TransportError> {
        let request = self.request(submission)?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| TransportError::network(SERVICE, e))?;

        let status = response.status();
        info!(status = status.as_u16(), "Email API responded");

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Failed to read email API response body");
                String::new()
            }
        };
        let id = interpret_response(status, &body)?;
        debug!(id = ?id, "Email accepted");
        Ok(())
    }
}

/// Decide success from the status code, reading the body only for detail.
///
/// Returns the message id when the body carries one.
pub fn interpret_response(status: StatusCode, body: &str) -> Result<Option<String>, TransportError> {
    let parsed: Option<EmailResponse> = match serde_json::from_str(body) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(error = %e, "Email API response is not JSON");
            None
        }
    };

    if status.is_success() {
        return Ok(parsed.and_then(|p| p.id));
    }

    let message = match parsed {
        Some(EmailResponse {
            message: Some(message),
            ..
        }) => message,
        Some(_) => "Email sending failed".to_string(),
        None => format!(
            "API error: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        )
        .trim_end()
        .to_string(),
    };

    Err(TransportError::Rejected {
        service: SERVICE,
        status: status.as_u16(),
        message,
    })
}

/// Build the JSON request body for a submission.
pub fn build_request(submission: &Submission, envelope: &Envelope) -> Result<EmailRequest> {
    Ok(EmailRequest {
        from: envelope.sender.clone(),
        to: envelope.recipient.clone(),
        reply_to: submission.email.clone(),
        subject: format!("{SUBJECT_PREFIX}{}", submission.subject),
        html: render_html(submission, &envelope.origin)?,
    })
}

/// HTML email body
#[derive(Template)]
#[template(path = "emails/contact.html")]
struct ContactEmailTemplate<'a> {
    name: &'a str,
    email: &'a str,
    /// Message split on newlines; the template joins the escaped lines
    /// with `<br>`
    message_lines: Vec<&'a str>,
    origin: &'a str,
}

/// HTML body with labeled fields and an origin footer.
pub fn render_html(submission: &Submission, origin: &str) -> Result<String> {
    let template = ContactEmailTemplate {
        name: &submission.name,
        email: &submission.email,
        message_lines: submission
            .message
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect(),
        origin,
    };

    template
        .render()
        .context("Failed to render HTML email template")
}

// --- Email API request/response types ---

#[derive(Debug, Serialize, PartialEq)]
pub struct EmailRequest {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Deserialize)]
struct EmailResponse {
    id: Option<String>,
    message: Option<String>,
}
