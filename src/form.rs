// Form shell — the four input values, the status line, and the submit
// control.
//
// This is the effectful side of a submission: it shows the pending line,
// disables the submit control for the whole attempt, applies the outcome
// (status copy, clearing fields on a send), and re-enables the control on
// every exit path through `SubmitGuard`'s Drop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::submission::models::PENDING_MESSAGE;
use crate::submission::{StatusTone, Submission, SubmissionController, SubmissionOutcome};

/// Enabled/disabled flag for the submit control. Clones share the flag.
#[derive(Debug, Clone)]
pub struct SubmitControl {
    enabled: Arc<AtomicBool>,
}

impl Default for SubmitControl {
    fn default() -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl SubmitControl {
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Disable until the returned guard is dropped. `None` if the control
    /// is already disabled (a submission is in flight).
    pub fn disable(&self) -> Option<SubmitGuard> {
        self.enabled
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| SubmitGuard {
                enabled: Arc::clone(&self.enabled),
            })
    }
}

/// Re-enables the submit control when dropped.
#[derive(Debug)]
pub struct SubmitGuard {
    enabled: Arc<AtomicBool>,
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.enabled.store(true, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub tone: StatusTone,
}

#[derive(Debug, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    status: Option<StatusLine>,
    submit: SubmitControl,
}

impl ContactForm {
    pub fn new(submission: Submission) -> Self {
        Self {
            name: submission.name,
            email: submission.email,
            subject: submission.subject,
            message: submission.message,
            ..Self::default()
        }
    }

    /// Handle to the submit control, for observers.
    pub fn submit_control(&self) -> SubmitControl {
        self.submit.clone()
    }

    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    pub fn set_status(&mut self, text: &str, tone: StatusTone) {
        self.status = Some(StatusLine {
            text: text.to_string(),
            tone,
        });
    }

    /// Current field values as a submission.
    pub fn snapshot(&self) -> Submission {
        Submission {
            name: self.name.clone(),
            email: self.email.clone(),
            subject: self.subject.clone(),
            message: self.message.clone(),
        }
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.email.clear();
        self.subject.clear();
        self.message.clear();
    }

    /// Run one submission through the controller and update the form.
    ///
    /// Returns `None` without doing anything if the submit control is
    /// disabled.
    pub async fn submit(
        &mut self,
        controller: &SubmissionController,
        now: DateTime<Utc>,
    ) -> Option<SubmissionOutcome> {
        let _guard = self.submit.disable()?;

        self.set_status(PENDING_MESSAGE, StatusTone::Pending);
        let outcome = controller.submit(&self.snapshot(), now).await;
        self.apply(&outcome);

        Some(outcome)
    }

    /// Status copy and color for the outcome; fields cleared only on a send.
    pub fn apply(&mut self, outcome: &SubmissionOutcome) {
        self.set_status(outcome.message(), outcome.tone());
        if outcome.is_sent() {
            self.clear();
        }
    }
}
