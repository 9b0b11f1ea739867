//! `opentag` — terminal browser for the esports tag registry.
//!
//! # Usage
//!
//! ```
//! opentag --data-dir ./data
//! opentag --url https://example.org/opentag/data
//! opentag --config ~/.config/opentag/config.toml
//! ```

mod app;
mod ui;

use std::{io, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use opentag_store::{DocumentSource, FsSource, HttpSource, SourceError, TagStore};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "opentag", about = "Terminal browser for the esports tag registry")]
struct Args {
  /// Path to a TOML config file (data_dir, url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Directory containing tags.json and patterns.json (default: ./data).
  #[arg(long, env = "OPENTAG_DATA_DIR")]
  data_dir: Option<std::path::PathBuf>,

  /// Base URL serving the two documents; takes precedence over --data-dir.
  #[arg(long, env = "OPENTAG_URL")]
  url: Option<String>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  data_dir: String,
  #[serde(default)]
  url:      String,
}

// ─── Document source selection ────────────────────────────────────────────────

/// The shell owns where the documents come from; the store only sees this.
enum AnySource {
  Fs(FsSource),
  Http(HttpSource),
}

impl DocumentSource for AnySource {
  async fn fetch(&self, name: &str) -> Result<Vec<u8>, SourceError> {
    match self {
      Self::Fs(s) => s.fetch(name).await,
      Self::Http(s) => s.fetch(name).await,
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  // Logs go to stderr so they never corrupt the alternate screen.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(io::stderr)
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()));
  let source = match url {
    Some(url) => AnySource::Http(HttpSource::new(url).context("building HTTP client")?),
    None => {
      let dir = args
        .data_dir
        .or_else(|| (!file_cfg.data_dir.is_empty()).then(|| file_cfg.data_dir.clone().into()))
        .unwrap_or_else(|| "data".into());
      AnySource::Fs(FsSource::new(dir))
    }
  };

  // Load both documents before entering the TUI; a failed load is terminal
  // for the session and the user reruns after fixing the source.
  let store = TagStore::new(source);
  let snapshot = store.load().await.context("loading tag documents")?;
  let mut app = App::new(&snapshot);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app);

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    if event::poll(Duration::from_millis(50)).context("polling events")? {
      match event::read().context("reading event")? {
        Event::Key(key) => {
          if !app.handle_key(key) {
            break;
          }
        }
        Event::Resize(_, _) => {
          // Terminal redraws on the next iteration.
        }
        _ => {}
      }
    }
  }

  Ok(())
}
