//! Desktop host for the contacts core.
//!
//! # Responsibility
//! - Stand in for the device shell: supply a contact source, launch the app.
//! - Print the list screen and, when a row is selected, the detail screen.

use anyhow::{Context, Result};
use clap::Parser;
use contacts_core::{
    default_log_level, init_logging, AppConfig, ContactSource, ContactsApp, DetailPresentation,
    FixtureSource, Screen,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(about = "Browse device contacts from a JSON fixture")]
struct Cli {
    /// TOML settings file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON array of raw contact tuples; the built-in debug fixture when absent.
    #[arg(long)]
    fixture: Option<PathBuf>,
    /// Absolute directory for rolling log files; logging is off when absent.
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// Overrides the configured log level.
    #[arg(long)]
    log_level: Option<String>,
    /// Overrides the configured directory timeout.
    #[arg(long)]
    load_timeout_ms: Option<u64>,
    /// Taps the list row at this position after launch.
    #[arg(long)]
    select: Option<usize>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.log_level = Some(level);
    }
    if let Some(timeout) = cli.load_timeout_ms {
        config.load_timeout_ms = Some(timeout);
    }

    if let Some(log_dir) = &cli.log_dir {
        let level = config.log_level.as_deref().unwrap_or(default_log_level());
        let log_dir = log_dir
            .to_str()
            .context("log directory must be valid UTF-8")?;
        init_logging(level, log_dir)?;
    }

    let source: Arc<dyn ContactSource> = match &cli.fixture {
        Some(path) => Arc::new(FixtureSource::from_json_file(path)?),
        None => Arc::new(FixtureSource::desktop_debug()),
    };

    let mut app = ContactsApp::launch(config, source).await?;
    if let Some(err) = app.last_load_error() {
        eprintln!("contacts could not be loaded: {err}");
    }

    println!("Contacts");
    for (position, row) in app.list_rows().iter().enumerate() {
        println!("  [{position}] {}", row.name);
    }

    if let Some(index) = cli.select {
        app.select_row(index, None)?;
        match (app.views().current(), app.views().detail()) {
            (Screen::Detail, Some(detail)) => print_detail(detail),
            _ => eprintln!("no contact at row {index}"),
        }
    }

    log::info!(
        "event=cli_exit module=cli status=ok screen={}",
        app.views().current().as_str()
    );
    Ok(())
}

fn print_detail(detail: &DetailPresentation) {
    println!();
    println!("{}", detail.title);
    println!("  Phone numbers");
    for phone in &detail.phone_numbers {
        println!("    {}: {} <{}>", phone.label, phone.value, phone.href);
    }
    println!("  Email addresses");
    for email in &detail.emails {
        println!("    {}: {} <{}>", email.label, email.value, email.href);
    }
}
