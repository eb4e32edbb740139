//! usertable binary entry point.
//!
//! Parses CLI arguments, points tracing at a log file (stdout belongs to
//! the TUI), initializes the terminal in raw mode, runs the event loop,
//! and restores the terminal state on exit.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

mod api;
mod app;
mod cache;
mod error;
mod export;
mod ui;

use api::ApiClient;

#[derive(Parser, Debug)]
#[command(name = "usertable", version, about = "TUI to browse and edit user records behind a REST API")]
struct Args {
    /// Base URL of the user-records API.
    #[arg(long, env = "USERTABLE_API_URL", default_value = "http://localhost:2000")]
    api_url: String,

    /// File that receives tracing output (filtered by RUST_LOG).
    #[arg(long, default_value = "usertable.log")]
    log_file: String,
}

fn init_tracing(path: &str) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {path}"))?;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_file)?;
    tracing::info!(api_url = %args.api_url, "starting usertable");

    let client = ApiClient::new(&args.api_url)?;
    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, &client, &args.api_url);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        eprintln!("application error: {err}");
    }
    Ok(())
}
