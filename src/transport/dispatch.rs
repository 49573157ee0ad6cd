// Fallback transport: GitHub repository_dispatch.
//
// Fires a `contact-form-submission` event carrying the form fields and a
// timestamp. A workflow in the target repository picks it up. GitHub
// answers 204 No Content on success; every other status is a failure.
//
// API docs: https://docs.github.com/en/rest/repos/repos#create-a-repository-dispatch-event

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{header, Client, Request, StatusCode};
use serde::Serialize;
use tracing::info;

use super::traits::{Transport, TransportError};
use crate::config::FallbackCredentials;
use crate::submission::{Channel, Submission};

const SERVICE: &str = "dispatch API";

pub const EVENT_TYPE: &str = "contact-form-submission";
pub const ACCEPT: &str = "application/vnd.github.v3+json";

pub struct DispatchClient {
    client: Client,
    url: String,
    token: String,
}

impl DispatchClient {
    pub fn new(credentials: &FallbackCredentials) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: credentials.dispatch_url.clone(),
            token: credentials.token.clone(),
        })
    }

    /// The POST this client sends for a submission at `now`.
    pub fn request(&self, submission: &Submission, now: DateTime<Utc>) -> Result<Request, TransportError> {
        self.client
            .post(&self.url)
            .header(header::USER_AGENT, super::USER_AGENT)
            .header(header::ACCEPT, ACCEPT)
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .json(&build_request(submission, now))
            .build()
            .map_err(|e| TransportError::build(SERVICE, e))
    }
}

#[async_trait]
impl Transport for DispatchClient {
    fn channel(&self) -> Channel {
        Channel::Dispatch
    }

    async fn deliver(
        &self,
        submission: &Submission,
        now: DateTime<Utc>,
    ) -> Result<(), TransportError> {
        info!("Attempting delivery via repository dispatch");

        let request = self.request(submission, now)?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| TransportError::network(SERVICE, e))?;

        let status = response.status();
        info!(status = status.as_u16(), "Dispatch API responded");

        interpret_status(status)
    }
}

/// Only 204 counts as accepted.
pub fn interpret_status(status: StatusCode) -> Result<(), TransportError> {
    if status == StatusCode::NO_CONTENT {
        Ok(())
    } else {
        Err(TransportError::Rejected {
            service: SERVICE,
            status: status.as_u16(),
            message: format!("GitHub API error: {}", status.as_u16()),
        })
    }
}

pub fn build_request(submission: &Submission, now: DateTime<Utc>) -> DispatchRequest {
    DispatchRequest {
        event_type: EVENT_TYPE.to_string(),
        client_payload: ClientPayload {
            name: submission.name.clone(),
            email: submission.email.clone(),
            subject: submission.subject.clone(),
            message: submission.message.clone(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        },
    }
}

// --- Dispatch API request types ---

#[derive(Debug, Serialize)]
pub struct DispatchRequest {
    pub event_type: String,
    pub client_payload: ClientPayload,
}

#[derive(Debug, Serialize)]
pub struct ClientPayload {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    /// ISO-8601, UTC, millisecond precision
    pub timestamp: String,
}
