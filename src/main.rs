//! Outlook tutorial - OAuth2 sign-in plus mail, calendar and contacts
//!
//! Each command mirrors one route of the original web tutorial. The session
//! (tokens and user email) lives in a TOML file between invocations.

mod api;
mod auth;
mod config;
mod error;
mod handlers;
mod models;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use handlers::App;
use session::FileSession;

#[derive(Parser)]
#[command(name = "outlook-tutorial")]
#[command(
    about = "Sign in with a Microsoft account and read mail, events and contacts",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sign-in URL
    Home,

    /// Complete sign-in with the code (or full redirect URL) from the browser
    Gettoken {
        /// Authorization code or redirect URL containing `?code=`
        code: String,
    },

    /// List the ten most recent inbox messages
    Mail,

    /// List the next ten calendar events
    Events,

    /// List ten contacts
    Contacts,

    /// Send a file as an attachment
    Send {
        /// Recipient address
        #[arg(short, long)]
        to: String,

        /// File to attach
        #[arg(short, long)]
        file: PathBuf,

        /// Message subject
        #[arg(short, long, default_value = "File from outlook-tutorial")]
        subject: String,
    },

    /// Show current user info (verify auth works)
    Whoami,

    /// Show current session status
    Status,

    /// Clear the stored session
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mut session = FileSession::load(Config::session_path()?)?;
    let output = run(&cli.command, &mut session).await;

    // Refreshes and failed refreshes both change the session
    session.save()?;
    tracing::debug!("Session saved to {}", session.path().display());

    println!("{}", output?);
    Ok(())
}

async fn run(command: &Commands, session: &mut FileSession) -> Result<String> {
    if let Commands::Logout = command {
        handlers::logout(session);
        return Ok("Logged out.".to_string());
    }

    let config = Config::load()?;
    let app = App::from_config(&config)?;

    match command {
        Commands::Home => Ok(app.home()),
        Commands::Gettoken { code } => {
            tracing::info!("Exchanging authorization code...");
            app.gettoken(session, code).await
        }
        Commands::Mail => app.mail(session).await,
        Commands::Events => app.events(session).await,
        Commands::Contacts => app.contacts(session).await,
        Commands::Send { to, file, subject } => {
            tracing::info!("Sending message...");
            app.send(session, to, subject, file).await
        }
        Commands::Whoami => app.whoami(session).await,
        Commands::Status => Ok(app.status(&*session)),
        Commands::Logout => Ok(String::new()),
    }
}
