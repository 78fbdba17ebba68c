//! Turn user-typed references into ids.
//!
//! A reference matches, in order of preference: an exact id, a
//! case-insensitive exact name, or a unique id prefix.

use anyhow::{Result, bail};
use squad_core::{board::Board, root::Root};

/// Resolve `needle` against `(id, name)` candidates. `kind` names the entity
/// in error messages.
pub fn resolve<'a, I>(kind: &str, needle: &str, candidates: I) -> Result<String>
where
  I: IntoIterator<Item = (&'a str, &'a str)>,
{
  let candidates: Vec<(&str, &str)> = candidates.into_iter().collect();

  if let Some((id, _)) = candidates.iter().find(|(id, _)| *id == needle) {
    return Ok((*id).to_owned());
  }

  let lowered = needle.to_lowercase();
  let by_name: Vec<&str> = candidates
    .iter()
    .filter(|(_, name)| name.to_lowercase() == lowered)
    .map(|(id, _)| *id)
    .collect();
  match by_name.as_slice() {
    [id] => return Ok((*id).to_owned()),
    [] => {}
    many => bail!("{} {kind}s are named {needle:?}; use an id: {}", many.len(), many.join(", ")),
  }

  let by_prefix: Vec<&str> = candidates
    .iter()
    .filter(|(id, _)| !needle.is_empty() && id.starts_with(needle))
    .map(|(id, _)| *id)
    .collect();
  match by_prefix.as_slice() {
    [id] => Ok((*id).to_owned()),
    [] => bail!("no {kind} matches {needle:?}"),
    many => bail!("{needle:?} matches {} {kind}s: {}", many.len(), many.join(", ")),
  }
}

pub fn player(board: &Board, needle: &str) -> Result<String> {
  resolve(
    "player",
    needle,
    board.players.values().map(|p| (p.id.as_str(), p.name.as_str())),
  )
}

pub fn tournament(root: &Root, needle: &str) -> Result<String> {
  resolve(
    "tournament",
    needle,
    root.tournaments.values().map(|t| (t.id.as_str(), t.name.as_str())),
  )
}

/// Drafts of the selected tournament are tried first, so a name such as
/// "Draft 1" refers to the one the user is looking at.
pub fn draft(root: &Root, needle: &str) -> Result<String> {
  let local = root
    .drafts_of(&root.ui.current_tournament_id)
    .into_iter()
    .map(|d| (d.id.as_str(), d.name.as_str()));
  resolve("draft", needle, local).or_else(|_| {
    resolve(
      "draft",
      needle,
      root.drafts.values().map(|d| (d.id.as_str(), d.name.as_str())),
    )
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  const PEOPLE: [(&str, &str); 3] = [
    ("a1b2", "Alice"),
    ("a1c3", "Bob"),
    ("d4e5", "alice"),
  ];

  #[test]
  fn exact_id_wins() {
    assert_eq!(resolve("player", "d4e5", PEOPLE).unwrap(), "d4e5");
  }

  #[test]
  fn name_is_case_insensitive_but_must_be_unique() {
    assert_eq!(resolve("player", "BOB", PEOPLE).unwrap(), "a1c3");
    let err = resolve("player", "ALICE", PEOPLE).unwrap_err();
    assert!(err.to_string().contains("2 players"));
  }

  #[test]
  fn unique_prefix_resolves() {
    assert_eq!(resolve("player", "d4", PEOPLE).unwrap(), "d4e5");
    assert!(resolve("player", "a1", PEOPLE).is_err());
    assert!(resolve("player", "zz", PEOPLE).is_err());
    assert!(resolve("player", "", PEOPLE).is_err());
  }

  #[test]
  fn draft_names_prefer_the_selected_tournament() {
    let root = Root::new_default();
    let first_draft = root.ui.current_draft_id.clone();
    let root = root.add_tournament(None);
    let second_draft = root.ui.current_draft_id.clone();

    // Both tournaments have a "Draft 1".
    assert_eq!(draft(&root, "draft 1").unwrap(), second_draft);
    let root = root.select_draft(&first_draft);
    assert_eq!(draft(&root, "Draft 1").unwrap(), first_draft);
  }
}
