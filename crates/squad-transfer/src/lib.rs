//! CSV and JSON codecs for Squad boards and tournaments.
//!
//! Converts between text and [`squad_core`] domain types. Pure synchronous;
//! no storage dependencies. Everything read from outside passes through
//! [`squad_core::raw`] before it reaches a strict type.
//!
//! # Quick start
//!
//! ```no_run
//! use squad_core::board::Board;
//!
//! let players = squad_transfer::csv::parse_players("name,notes\nAda,keeper\n").unwrap();
//! let board = Board::empty().add_players(players);
//! println!("{}", squad_transfer::csv::export_board(&board).unwrap());
//! ```

pub mod csv;
pub mod error;
pub mod json;

pub use error::{Error, Result};

/// File formats accepted by `import` and produced by `export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
  /// Players only on import; a flat row per list entry on export.
  Csv,
  /// A single board.
  Json,
  /// A whole tournament with all of its drafts.
  Tournament,
}

impl Format {
  /// Conventional file name for an export in this format.
  pub fn default_file_name(self) -> &'static str {
    match self {
      Self::Csv => "draft_export.csv",
      Self::Json => "draft.json",
      Self::Tournament => "tournament.json",
    }
  }
}
