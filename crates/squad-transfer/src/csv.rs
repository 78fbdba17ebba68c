//! CSV import of players and flat CSV export of a board.

use serde::Serialize;
use squad_core::{
  board::{Board, ListKey},
  player::Player,
  raw::UNNAMED,
};
use strum::IntoEnumIterator;
use tracing::warn;

use crate::Result;

// ─── Import ──────────────────────────────────────────────────────────────────

/// Read players from CSV text with a header row.
///
/// The `name` and `notes` columns are matched case-insensitively; other
/// columns are ignored. Every row becomes a new [`Player`] with a fresh id, a
/// blank name becomes `"Unnamed"`, and blank rows are skipped. Rows that
/// cannot be read are logged and skipped.
pub fn parse_players(text: &str) -> Result<Vec<Player>> {
  let mut reader = ::csv::ReaderBuilder::new()
    .flexible(true)
    .trim(::csv::Trim::All)
    .from_reader(text.as_bytes());

  let headers = reader.headers()?.clone();
  let column = |want: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(want));
  let (name_col, notes_col) = (column("name"), column("notes"));

  let mut players = Vec::new();
  for (line, record) in reader.records().enumerate() {
    let record = match record {
      Ok(r) => r,
      Err(e) => {
        warn!("skipping malformed CSV row {}: {}", line + 1, e);
        continue;
      }
    };
    if record.iter().all(str::is_empty) {
      continue;
    }
    let field = |col: Option<usize>| col.and_then(|i| record.get(i)).unwrap_or_default();
    let name = match field(name_col) {
      "" => UNNAMED,
      name => name,
    };
    players.push(Player::new(name, field(notes_col)));
  }
  Ok(players)
}

// ─── Export ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Row<'a> {
  id:       &'a str,
  name:     &'a str,
  notes:    &'a str,
  bucket:   &'static str,
  position: usize,
}

/// Flatten `board` into one row per list entry:
/// `id,name,notes,bucket,position`, with `bucket` one of `available`, `yes`,
/// `maybe`, `no` and `position` the zero-based index within that list.
pub fn export_board(board: &Board) -> Result<String> {
  let mut writer = ::csv::Writer::from_writer(Vec::new());
  let mut wrote_any = false;
  for key in ListKey::iter() {
    for (position, id) in board.list(key).iter().enumerate() {
      let Some(player) = board.players.get(id) else { continue };
      writer.serialize(Row {
        id,
        name: &player.name,
        notes: &player.notes,
        bucket: key.into(),
        position,
      })?;
      wrote_any = true;
    }
  }
  if !wrote_any {
    writer.write_record(["id", "name", "notes", "bucket", "position"])?;
  }
  let bytes = writer.into_inner().map_err(|e| e.into_error())?;
  Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
  use squad_core::board::Bucket;

  use super::*;

  #[test]
  fn headers_match_case_insensitively() {
    let players = parse_players("NAME,Notes,extra\nAda,keeper,x\nBo,,y\n").unwrap();
    assert_eq!(players.len(), 2);
    assert_eq!(players[0].name, "Ada");
    assert_eq!(players[0].notes, "keeper");
    assert_eq!(players[1].notes, "");
    assert_ne!(players[0].id, players[1].id);
  }

  #[test]
  fn missing_name_becomes_unnamed() {
    let players = parse_players("name,notes\n,quick\n").unwrap();
    assert_eq!(players[0].name, UNNAMED);
    assert_eq!(players[0].notes, "quick");

    let players = parse_players("notes\nonly notes\n").unwrap();
    assert_eq!(players[0].name, UNNAMED);
  }

  #[test]
  fn blank_rows_are_skipped() {
    let players = parse_players("name,notes\nA,1\n\n , \nB,2\n").unwrap();
    let names: Vec<_> = players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["A", "B"]);
  }

  #[test]
  fn short_rows_are_tolerated() {
    let players = parse_players("name,notes\nSolo\n").unwrap();
    assert_eq!(players[0].name, "Solo");
    assert_eq!(players[0].notes, "");
  }

  #[test]
  fn imported_rows_land_last_first() {
    let players = parse_players("name\nfirst\nsecond\nthird\n").unwrap();
    let board = Board::empty().add_players(players);
    let names: Vec<_> = board
      .available_order
      .iter()
      .map(|id| board.players[id].name.as_str())
      .collect();
    assert_eq!(names, ["third", "second", "first"]);
  }

  #[test]
  fn export_lists_every_entry_with_position() {
    let board = Board::empty()
      .add_player("Cy", "")
      .add_player("Bo", "fast, strong")
      .add_player("Al", "");
    let ids = board.available_order.clone(); // [Al, Bo, Cy]
    let board = board
      .assign_to_bucket(&ids[2], Bucket::No)
      .assign_to_bucket(&ids[1], Bucket::Yes);

    let csv = export_board(&board).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines[0], "id,name,notes,bucket,position");
    assert_eq!(lines[1], format!("{},Al,,available,0", ids[0]));
    assert_eq!(lines[2], format!("{},Bo,\"fast, strong\",yes,0", ids[1]));
    assert_eq!(lines[3], format!("{},Cy,,no,0", ids[2]));
    assert_eq!(lines.len(), 4);
  }

  #[test]
  fn empty_board_exports_header_only() {
    let csv = export_board(&Board::empty()).unwrap();
    assert_eq!(csv.trim_end(), "id,name,notes,bucket,position");
  }
}
