//! Plain-text views of the board and the tournament tree.

use std::fmt::Write as _;

use squad_core::{
  board::{Board, ListKey},
  root::Root,
  session::Session,
};
use strum::IntoEnumIterator;

/// First eight characters of an id, enough to type as a prefix.
pub fn short_id(id: &str) -> String { id.chars().take(8).collect() }

fn marker(selected: bool) -> &'static str { if selected { "*" } else { " " } }

pub fn status(session: &Session) -> String {
  let root = session.root();
  let mut out = String::new();
  if let Some(t) = root.current_tournament() {
    let _ = writeln!(out, "Tournament: {} ({} drafts)", t.name, t.draft_ids.len());
  }
  if let Some(d) = root.current_draft() {
    let _ = writeln!(out, "Draft:      {}", d.name);
    let counts: Vec<String> = d
      .board
      .counts()
      .iter()
      .map(|(key, n)| format!("{} {n}", d.board.titles.get(*key)))
      .collect();
    let _ = writeln!(out, "Lists:      {}", counts.join(" | "));
  }
  let _ = write!(
    out,
    "Undo:       {}",
    if session.can_undo() { "available" } else { "nothing to undo" }
  );
  out
}

/// Every list with its title, count, and numbered players.
pub fn board(board: &Board) -> String {
  let mut out = String::new();
  for key in ListKey::iter() {
    let list = board.list(key);
    let _ = writeln!(out, "== {} ({}) [{key}]", board.titles.get(key), list.len());
    for (i, id) in list.iter().enumerate() {
      let Some(p) = board.players.get(id) else { continue };
      let _ = write!(out, "  {:>2}. {} ({})", i, p.name, short_id(id));
      if !p.notes.is_empty() {
        let _ = write!(out, " - {}", p.notes);
      }
      out.push('\n');
    }
  }
  out.trim_end().to_owned()
}

pub fn tournaments(root: &Root) -> String {
  root
    .tournaments
    .values()
    .map(|t| {
      format!(
        "{} {}  {}  ({} drafts)",
        marker(t.id == root.ui.current_tournament_id),
        short_id(&t.id),
        t.name,
        t.draft_ids.len(),
      )
    })
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn drafts(root: &Root, tournament_id: &str) -> String {
  root
    .drafts_of(tournament_id)
    .iter()
    .map(|d| {
      format!(
        "{} {}  {}  ({} players, updated {})",
        marker(d.id == root.ui.current_draft_id),
        short_id(&d.id),
        d.name,
        d.board.players.len(),
        d.updated_at.format("%Y-%m-%d %H:%M"),
      )
    })
    .collect::<Vec<_>>()
    .join("\n")
}
