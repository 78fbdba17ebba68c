//! Command-line grammar, shared by one-shot invocations and the shell.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use squad_core::{
  board::{Bucket, ListKey},
  store::Theme,
};
use squad_transfer::Format;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
  /// Show the selected tournament and draft with list counts.
  Status,

  /// Print the current board, optionally filtered by a search query.
  Board {
    #[arg(short, long, default_value = "")]
    query: String,
  },

  /// Add, edit, remove, and sort players on the current board.
  #[command(subcommand)]
  Player(PlayerCommand),

  /// Rename a list. An empty title restores the default.
  Title {
    list: ListKey,
    #[arg(num_args = 0..)]
    text: Vec<String>,
  },

  /// Revert the most recent board change.
  Undo,

  #[command(subcommand)]
  Tournament(TournamentCommand),

  #[command(subcommand)]
  Draft(DraftCommand),

  /// Read players, a board, or a tournament bundle from a file.
  Import(ImportArgs),

  /// Write the current board or tournament to a file or stdout.
  Export(ExportArgs),

  /// Show or change the colour theme.
  Theme {
    theme: Option<Theme>,
    /// Switch to the other theme.
    #[arg(long, conflicts_with = "theme")]
    toggle: bool,
  },

  /// Interactive session; changes are saved in the background.
  Shell,
}

// ─── Players ──────────────────────────────────────────────────────────────────

/// Players are referenced by id, unique id prefix, or name.
#[derive(Subcommand, Debug, Clone)]
pub enum PlayerCommand {
  /// Add a player to the top of the available pool.
  Add {
    name:  String,
    #[arg(short, long, default_value = "")]
    notes: String,
  },

  /// Change a player's name or notes.
  Edit {
    player: String,
    #[arg(long)]
    name:   Option<String>,
    #[arg(short, long)]
    notes:  Option<String>,
  },

  /// Delete a player from the available pool, or send a sorted player back
  /// to it. With `--hard`, always delete.
  Remove {
    player: String,
    #[arg(long)]
    hard:   bool,
  },

  /// Put a player at the top of a bucket.
  Assign { player: String, bucket: Bucket },

  /// Send a player back to the available pool.
  Release { player: String },

  /// Drop a player at a position in a list, as a drag would.
  Move {
    player: String,
    to:     ListKey,
    /// Position among the players visible under `--query`.
    index:  usize,
    #[arg(short, long, default_value = "")]
    query:  String,
  },
}

// ─── Tournaments and drafts ──────────────────────────────────────────────────

#[derive(Subcommand, Debug, Clone)]
pub enum TournamentCommand {
  List,
  /// Create a tournament with one empty draft and select it.
  Add { name: Option<String> },
  Rename { tournament: String, name: String },
  /// Delete a tournament and all of its drafts.
  Delete { tournament: String },
  /// Copy a tournament and all of its drafts.
  Duplicate { tournament: String },
  Select { tournament: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum DraftCommand {
  /// List the drafts of a tournament (default: the selected one).
  List {
    #[arg(short, long)]
    tournament: Option<String>,
  },
  /// Add a draft and select it.
  Add {
    name:       Option<String>,
    #[arg(short, long)]
    tournament: Option<String>,
    /// Start from a copy of the current board instead of an empty one.
    #[arg(long)]
    copy:       bool,
  },
  Rename { draft: String, name: String },
  Delete { draft: String },
  Duplicate { draft: String },
  /// Move a draft to another tournament.
  Move { draft: String, tournament: String },
  Select { draft: String },
}

// ─── Import / export ─────────────────────────────────────────────────────────

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
  Csv,
  Json,
  Tournament,
}

impl From<FormatArg> for Format {
  fn from(arg: FormatArg) -> Self {
    match arg {
      FormatArg::Csv => Format::Csv,
      FormatArg::Json => Format::Json,
      FormatArg::Tournament => Format::Tournament,
    }
  }
}

#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
  pub format:    FormatArg,
  pub file:      PathBuf,
  /// JSON only: create a new draft instead of replacing the current board.
  #[arg(long)]
  pub new_draft: bool,
  /// Name for the new draft.
  #[arg(long, requires = "new_draft")]
  pub name:      Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
  pub format:     FormatArg,
  /// Output file, or a directory to write the default file name into.
  /// Prints to stdout when omitted.
  #[arg(short, long)]
  pub out:        Option<PathBuf>,
  /// Tournament to export (tournament format; default: the selected one).
  #[arg(short, long)]
  pub tournament: Option<String>,
}
