use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use contact_relay::config::Config;
use contact_relay::db::{MemoryStore, StateStore};
use contact_relay::form::ContactForm;
use contact_relay::output::terminal;
use contact_relay::submission::rate_limit::{self, RateLimiter};
use contact_relay::submission::{Submission, SubmissionController};
use contact_relay::transport::{self, dispatch, email, Envelope};

/// contact-relay: deliver contact form submissions.
///
/// Sends through the email API, falls back to a GitHub repository dispatch
/// event, and throttles to one submission per minute.
#[derive(Parser)]
#[command(name = "contact-relay", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the state database
    Init,

    /// Submit one message
    Send {
        #[command(flatten)]
        form: FormArgs,

        /// Keep the rate-limit timestamp in memory only
        #[arg(long)]
        ephemeral: bool,
    },

    /// Print the requests a submission would make, without sending
    Preview {
        #[command(flatten)]
        form: FormArgs,
    },

    /// Show transport configuration and rate-limit state
    Status,
}

#[derive(Args)]
struct FormArgs {
    /// Sender's name
    #[arg(long)]
    name: String,

    /// Sender's email (used as reply-to)
    #[arg(long)]
    email: String,

    #[arg(long)]
    subject: String,

    /// Message body (read from stdin when omitted)
    #[arg(long)]
    message: Option<String>,
}

impl FormArgs {
    fn into_submission(self) -> Result<Submission> {
        let message = match self.message {
            Some(message) => message,
            None => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read message from stdin")?;
                buf
            }
        };
        Ok(Submission::new(self.name, self.email, self.subject, message))
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("contact_relay=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Init => {
            info!("Initializing state database...");
            let count = init_database(&config).await?;
            println!("State database ready at: {}", config.db_path_display());
            println!("Tables: {count}");
            println!("\nSet RESEND_API_KEY and/or GITHUB_TOKEN in your .env file,");
            println!("then run: contact-relay send --name ... --email ... --subject ...");
        }

        Commands::Send { form, ephemeral } => {
            let submission = form.into_submission()?;
            let store = open_store(&config, ephemeral)?;
            let moderator = contact_relay::moderation::from_word_list(&config.blocked_words)?;
            let transports = transport::build(&config.transport_config(), envelope(&config))?;
            let controller = SubmissionController::new(transports, moderator, store);

            info!(
                transports = controller.transports().describe(),
                from = %terminal::summarize(&submission),
                "Submitting contact form"
            );

            let mut form = ContactForm::new(submission);
            let Some(outcome) = form.submit(&controller, Utc::now()).await else {
                anyhow::bail!("Submit control is disabled");
            };

            if let Some(status) = form.status() {
                terminal::display_status(status);
            }

            if !outcome.is_sent() {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Preview { form } => {
            let submission = form.into_submission()?;
            let now = Utc::now();
            let email = email::build_request(&submission, &envelope(&config))?;
            let dispatch = dispatch::build_request(&submission, now);
            terminal::display_preview(&email, &dispatch);
        }

        Commands::Status => {
            let transports = config.transport_config();
            println!("Transports: {}", transports.describe());
            if let Some(primary) = transports.primary() {
                println!("  Email API: {}", primary.endpoint);
            }
            if let Some(fallback) = transports.fallback() {
                println!("  Dispatch: {}", fallback.dispatch_url);
            }
            if !config.blocked_words.is_empty() {
                println!("Moderation: {} blocked words", config.blocked_words.len());
            }

            println!("State: {}", config.db_path_display());
            if !config.db_path.exists() {
                println!(
                    "  {}",
                    "not initialized (run `contact-relay init`)".dimmed()
                );
                return Ok(ExitCode::SUCCESS);
            }

            let store = open_existing_store(&config)?;
            let last = rate_limit::last_submission(store.as_ref()).await?;
            terminal::display_rate_limit(last, Utc::now(), &RateLimiter::default());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn envelope(config: &Config) -> Envelope {
    Envelope {
        sender: config.sender.clone(),
        recipient: config.recipient.clone(),
        origin: config.origin.clone(),
    }
}

#[cfg(feature = "sqlite")]
async fn init_database(config: &Config) -> Result<i64> {
    let conn = contact_relay::db::initialize(&config.db_path)?;
    let store = contact_relay::db::SqliteStore::new(conn);
    store.table_count().await
}

#[cfg(not(feature = "sqlite"))]
async fn init_database(_config: &Config) -> Result<i64> {
    anyhow::bail!("Built without the `sqlite` feature; nothing to initialize")
}

/// The state store for this run. Creates the database on first use so a
/// missing `init` never blocks a submission.
#[cfg(feature = "sqlite")]
fn open_store(config: &Config, ephemeral: bool) -> Result<Arc<dyn StateStore>> {
    if ephemeral {
        return Ok(Arc::new(MemoryStore::default()));
    }
    let conn = contact_relay::db::initialize(&config.db_path)?;
    Ok(Arc::new(contact_relay::db::SqliteStore::new(conn)))
}

#[cfg(not(feature = "sqlite"))]
fn open_store(_config: &Config, ephemeral: bool) -> Result<Arc<dyn StateStore>> {
    if !ephemeral {
        tracing::warn!("Built without the `sqlite` feature; rate-limit state is not persisted");
    }
    Ok(Arc::new(MemoryStore::default()))
}

#[cfg(feature = "sqlite")]
fn open_existing_store(config: &Config) -> Result<Arc<dyn StateStore>> {
    let conn = contact_relay::db::open(&config.db_path)?;
    Ok(Arc::new(contact_relay::db::SqliteStore::new(conn)))
}

#[cfg(not(feature = "sqlite"))]
fn open_existing_store(_config: &Config) -> Result<Arc<dyn StateStore>> {
    Ok(Arc::new(MemoryStore::default()))
}
