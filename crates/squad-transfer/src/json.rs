//! JSON import and export: single boards and tournament bundles.
//!
//! A board file is the board object itself (`players`, `availableOrder`,
//! `buckets`, `titles`). A tournament bundle wraps every draft of one
//! tournament:
//!
//! ```json
//! { "version": 2,
//!   "tournament": { "id": "...", "name": "..." },
//!   "drafts": [ { "id": "...", "name": "...", "createdAt": 0, "updatedAt": 0,
//!                 "players": {}, "availableOrder": [], "buckets": {}, "titles": {} } ] }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use squad_core::{
  board::Board,
  raw::{RawBoard, normalize_board},
  root::{Root, SCHEMA_VERSION},
};

use crate::{Error, Result};

// ─── Boards ──────────────────────────────────────────────────────────────────

pub fn export_board(board: &Board) -> Result<String> {
  Ok(serde_json::to_string_pretty(board)?)
}

/// Read a board file.
///
/// The file must be an object carrying `players`, `availableOrder`, and
/// `buckets` with `yes`, `maybe`, and `no`; anything less is rejected so a
/// mistaken file never silently replaces a board. Beyond those keys the
/// content is normalized like any other untrusted board.
pub fn import_board(text: &str) -> Result<Board> {
  let value: Value = serde_json::from_str(text)?;
  let object = value.as_object().ok_or(Error::NotAnObject)?;
  require_board_keys(object)?;
  Ok(normalize_board(RawBoard::deserialize(value)?))
}

fn require_board_keys(object: &Map<String, Value>) -> Result<()> {
  for key in ["players", "availableOrder", "buckets"] {
    if !object.contains_key(key) {
      return Err(Error::MissingField(key));
    }
  }
  let buckets = object
    .get("buckets")
    .and_then(Value::as_object)
    .ok_or(Error::MissingField("buckets"))?;
  for (key, field) in [
    ("yes", "buckets.yes"),
    ("maybe", "buckets.maybe"),
    ("no", "buckets.no"),
  ] {
    if !buckets.contains_key(key) {
      return Err(Error::MissingField(field));
    }
  }
  Ok(())
}

// ─── Tournament bundles ──────────────────────────────────────────────────────

#[derive(Serialize)]
struct Bundle<'a> {
  version:    u32,
  tournament: BundleTournament<'a>,
  drafts:     Vec<BundleDraft<'a>>,
}

#[derive(Serialize)]
struct BundleTournament<'a> {
  id:   &'a str,
  name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BundleDraft<'a> {
  id:         &'a str,
  name:       &'a str,
  #[serde(with = "chrono::serde::ts_milliseconds")]
  created_at: DateTime<Utc>,
  #[serde(with = "chrono::serde::ts_milliseconds")]
  updated_at: DateTime<Utc>,
  #[serde(flatten)]
  board:      &'a Board,
}

/// Serialise tournament `tournament_id` and its drafts, in order.
pub fn export_tournament(root: &Root, tournament_id: &str) -> Result<String> {
  let tournament = root
    .tournaments
    .get(tournament_id)
    .ok_or_else(|| Error::UnknownTournament(tournament_id.to_owned()))?;

  let bundle = Bundle {
    version:    SCHEMA_VERSION,
    tournament: BundleTournament { id: &tournament.id, name: &tournament.name },
    drafts:     root
      .drafts_of(tournament_id)
      .into_iter()
      .map(|d| BundleDraft {
        id:         &d.id,
        name:       &d.name,
        created_at: d.created_at,
        updated_at: d.updated_at,
        board:      &d.board,
      })
      .collect(),
  };
  Ok(serde_json::to_string_pretty(&bundle)?)
}

/// A tournament bundle as read back: the tournament's name and each draft's
/// name with its normalized board. Ids in the file are not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedTournament {
  pub name:   String,
  pub drafts: Vec<(String, Board)>,
}

impl ImportedTournament {
  /// Add the bundle to `root` as a new tournament with fresh ids.
  pub fn apply_to(self, root: &Root) -> Root {
    root.import_tournament(&self.name, self.drafts)
  }
}

/// Read a tournament bundle.
///
/// `tournament` and `drafts` are required. Individual drafts are normalized
/// leniently; a draft entry that is not an object becomes an empty board.
pub fn import_tournament(text: &str) -> Result<ImportedTournament> {
  let value: Value = serde_json::from_str(text)?;
  let object = value.as_object().ok_or(Error::NotAnObject)?;
  let tournament = object
    .get("tournament")
    .and_then(Value::as_object)
    .ok_or(Error::MissingField("tournament"))?;
  let drafts = object
    .get("drafts")
    .and_then(Value::as_array)
    .ok_or(Error::MissingField("drafts"))?;

  let name = tournament
    .get("name")
    .and_then(Value::as_str)
    .unwrap_or_default()
    .to_owned();
  let drafts = drafts
    .iter()
    .map(|d| {
      let name = d.get("name").and_then(Value::as_str).unwrap_or_default();
      let raw = RawBoard::deserialize(d).unwrap_or_default();
      (name.to_owned(), normalize_board(raw))
    })
    .collect();
  Ok(ImportedTournament { name, drafts })
}
