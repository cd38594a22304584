mod commands;
mod config;
mod infrastructure;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use setlist_config::{SetlistPaths, TomlConfigBackend};
use setlist_core::ports::{KeyValueStore, MemoryStore};
use setlist_core::services::SetlistService;
use setlist_storage::{StorageConfig, StoreBackend};

pub use commands::{Flow, InnerCli, InnerCommand, Shell};
pub use config::ShellConfig;
use infrastructure::share::TerminalShare;

#[derive(Parser, Debug)]
#[command(name = "setlist", about = "Song catalog, setlists and history for live sets")]
pub struct CliArgs {
  /// Keep config and data under this directory instead of the system ones.
  #[arg(long, env = "SETLIST_BASE_DIR")]
  pub base_dir: Option<PathBuf>,

  /// Scratch session: nothing is read from or written to disk.
  #[arg(long)]
  pub memory: bool,
}

/// Logs go to stderr so they never mix with shell output. `RUST_LOG` overrides.
fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(io::stderr)
    .try_init();
}

pub fn run() -> Result<()> {
  init_tracing();
  let args = CliArgs::parse();

  // --- Dependency Injection Phase ---

  // 1. Config + persistence adapter (SQLite or JSON dir, per [storage]).
  let (shell_cfg, store) = open_store(&args)?;

  // 2. Core service: loads songs + history once.
  let service = SetlistService::open(store)
    .context("loading saved songs and history")?
    .with_share_base_url(shell_cfg.share_base_url.clone());

  // 3. Output port adapter for sharing.
  let share = TerminalShare::new(io::stdout(), shell_cfg.open_browser);

  let mut shell = Shell::new(service, share, shell_cfg.default_sort);
  repl(&mut shell, &shell_cfg.prompt)
}

fn open_store(args: &CliArgs) -> Result<(ShellConfig, Box<dyn KeyValueStore>)> {
  if args.memory {
    let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
    return Ok((ShellConfig::default(), store));
  }

  let Some(base) = &args.base_dir else {
    let store: Box<dyn KeyValueStore> = Box::new(StoreBackend::new_from_config()?);
    return Ok((ShellConfig::load()?, store));
  };

  let backend = TomlConfigBackend::new(SetlistPaths::from_base(base)?);
  let storage_cfg = StorageConfig::load_from(&backend)?;
  let store: Box<dyn KeyValueStore> = Box::new(StoreBackend::open(&storage_cfg, backend.paths())?);
  Ok((ShellConfig::load_from(&backend)?, store))
}

fn repl<S: KeyValueStore>(shell: &mut Shell<S, TerminalShare<io::Stdout>>, prompt: &str) -> Result<()> {
  let stdin = io::stdin();
  let mut reader = stdin.lock();
  let mut stdout = io::stdout();

  loop {
    print!("{prompt}");
    stdout.flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    if reader.read_line(&mut line).context("Failed to read line")? == 0 {
      break;
    }

    if let Flow::Exit = shell.run_line(&line, &mut stdout)? {
      break;
    }
  }
  Ok(())
}
