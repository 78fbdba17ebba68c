//! `squad` — sort a roster into Yes / Maybe / No from the terminal.
//!
//! # Usage
//!
//! ```text
//! squad player add "Ada Lovelace" --notes keeper
//! squad player assign ada yes
//! squad board --query keeper
//! squad export csv --out ./exports
//! squad shell
//! ```
//!
//! State lives in one SQLite file (`store_path` in `squad.toml`, the
//! `SQUAD_STORE_PATH` environment variable, or `--store`).

mod cli;
mod commands;
mod render;
mod resolve;
mod settings;
mod shell;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use squad_core::store::RootStore;
use squad_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{
  cli::Command,
  settings::{Settings, expand_tilde},
};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "squad", version, about = "Sort a roster into Yes / Maybe / No")]
struct Args {
  /// Path to a TOML config file (store_path, debounce_ms).
  #[arg(short, long, value_name = "FILE", default_value = "squad.toml")]
  config: PathBuf,

  /// SQLite file to use instead of the configured one.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();
  let settings = Settings::load(&args.config)?;

  let store_path = expand_tilde(args.store.as_ref().unwrap_or(&settings.store_path));
  let kv = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {}", store_path.display()))?;
  let store = RootStore::new(kv);

  match args.command {
    Command::Shell => shell::run(Arc::new(store), settings.debounce()).await,
    command => {
      let output = commands::run_once(&store, command).await?;
      if !output.is_empty() {
        println!("{output}");
      }
      Ok(())
    }
  }
}
