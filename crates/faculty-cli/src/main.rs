//! `faculty`: terminal client for the faculty research directory.
//!
//! # Usage
//!
//! ```
//! faculty                                   # interactive TUI
//! faculty search --topic "marine biology"
//! faculty show 42
//! faculty login 'http://localhost/auth/callback#access_token=…'
//! faculty edit 42 --research-areas "Hydrology, Groundwater"
//! ```
//!
//! Settings come from `faculty.toml` (or `--config`), then `FACULTY_*`
//! environment variables, then flags.

mod app;
mod commands;
mod detail;
mod session_store;
mod settings;
mod ui;

use std::{
  fs::OpenOptions,
  io,
  path::{Path, PathBuf},
  sync::Mutex,
  time::{Duration, Instant},
};

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use commands::{EditArgs, SearchArgs};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use faculty_client::ApiClient;
use faculty_core::{live::LiveSearch, record::FacultyId};
use ratatui::{Terminal, backend::CrosstermBackend};
use session_store::SessionStore;
use settings::{Settings, expand_tilde};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "faculty", version, about = "Search and edit the faculty research directory")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "faculty.toml")]
  config: PathBuf,

  /// Base URL of the directory API.
  #[arg(long)]
  url: Option<String>,

  /// Write TUI logs to this file.
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Interactive search (the default).
  Tui,
  /// Run one search and print the matches.
  Search(SearchArgs),
  /// Print one profile with its summary and keywords.
  Show {
    id:   FacultyId,
    #[arg(long)]
    json: bool,
  },
  /// List known departments.
  Departments {
    /// Print the broad research keywords of this department instead.
    #[arg(long, value_name = "DEPARTMENT")]
    broad_keywords: Option<String>,
  },
  /// Store a session from the sign-in redirect URL.
  Login {
    /// The full URL the identity provider redirected to.
    redirect_url: String,
  },
  /// Forget the stored session.
  Logout,
  /// Show who is signed in.
  Whoami,
  /// Update a profile you own.
  Edit(EditArgs),
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // Flags override environment, which overrides the config file.
  let mut settings = Settings::load(&args.config)?;
  if let Some(url) = args.url {
    settings.base_url = url;
  }
  if let Some(path) = args.log_file {
    settings.log_file = Some(expand_tilde(&path));
  }

  let command = args.command.unwrap_or(Command::Tui);
  init_tracing(&command, settings.log_file.as_deref())?;

  let client = ApiClient::new(settings.api_config()).context("building HTTP client")?;
  let store = SessionStore::new(settings.session_file.clone());

  match command {
    Command::Tui => run_tui(client, &settings, &store).await,
    Command::Search(search) => commands::search(&client, search).await,
    Command::Show { id, json } => commands::show(&client, id, json).await,
    Command::Departments { broad_keywords } => {
      commands::departments(&client, broad_keywords.as_deref()).await
    }
    Command::Login { redirect_url } => commands::login(&client, &store, &redirect_url).await,
    Command::Logout => commands::logout(&store),
    Command::Whoami => commands::whoami(&store),
    Command::Edit(edit) => commands::edit(&client, &store, edit).await,
  }
}

// ─── Logging ──────────────────────────────────────────────────────────────────

fn env_filter() -> EnvFilter {
  EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy()
}

/// The TUI owns the terminal, so it logs to a file or not at all. Every
/// other command logs to stderr.
fn init_tracing(command: &Command, log_file: Option<&Path>) -> Result<()> {
  match (command, log_file) {
    (Command::Tui, None) => {}
    (Command::Tui, Some(path)) => {
      let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
      tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    }
    _ => {
      tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .init();
    }
  }
  Ok(())
}

// ─── TUI ──────────────────────────────────────────────────────────────────────

async fn run_tui(client: ApiClient, settings: &Settings, store: &SessionStore) -> Result<()> {
  let session = store.load()?;
  let live = LiveSearch::new(settings.debounce()).with_live(settings.live_search);
  let mut app = App::new(client, live, session);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  app.start().await;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    app.tick(Instant::now());
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key).await?
    {
      break;
    }
  }

  Ok(())
}
