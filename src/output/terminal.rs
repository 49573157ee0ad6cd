// Colored terminal output for status lines, previews, and state.
//
// The status colors are the form's own hex colors rendered as truecolor.

use chrono::{DateTime, TimeZone, Utc};
use colored::{ColoredString, Colorize};

use crate::form::StatusLine;
use crate::submission::rate_limit::RateLimiter;
use crate::submission::{StatusTone, Submission};
use crate::transport::dispatch::DispatchRequest;
use crate::transport::email::EmailRequest;

pub fn colorize(text: &str, tone: StatusTone) -> ColoredString {
    let (r, g, b) = tone.rgb();
    text.truecolor(r, g, b)
}

/// Print the form's status line.
pub fn display_status(status: &StatusLine) {
    println!("{}", colorize(&status.text, status.tone).bold());
}

/// One-line summary of a submission for logs and confirmations.
pub fn summarize(submission: &Submission) -> String {
    format!(
        "{} <{}>: {}",
        submission.name, submission.email, submission.subject
    )
}

/// Show both request bodies without sending anything.
pub fn display_preview(email: &EmailRequest, dispatch: &DispatchRequest) {
    println!("\n{}", "=== Email request ===".bold());
    println!("  {} {}", "From:".dimmed(), email.from);
    println!("  {} {}", "To:".dimmed(), email.to);
    println!("  {} {}", "Reply-To:".dimmed(), email.reply_to);
    println!("  {} {}", "Subject:".dimmed(), email.subject);
    println!("\n{}", email.html);

    println!("\n{}", "=== Fallback dispatch payload ===".bold());
    match serde_json::to_string_pretty(dispatch) {
        Ok(json) => println!("{json}"),
        Err(e) => println!("  {} {}", "Could not render payload:".yellow(), e),
    }
}

/// Show the rate-limit state.
pub fn display_rate_limit(last_ms: Option<i64>, now: DateTime<Utc>, limiter: &RateLimiter) {
    let Some(last) = last_ms else {
        println!("Last submission: never");
        return;
    };

    match Utc.timestamp_millis_opt(last).single() {
        Some(at) => println!("Last submission: {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("Last submission: {last} (out of range)"),
    }

    let remaining = limiter.remaining_ms(Some(last), now.timestamp_millis());
    if remaining > 0 {
        let secs = (remaining + 999) / 1000;
        println!(
            "  {} next submission allowed in {}s",
            "~".yellow(),
            secs
        );
    } else {
        println!("  {} ready to send", "ok".green());
    }
}
