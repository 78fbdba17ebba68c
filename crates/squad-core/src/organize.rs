//! Organizational mutators: tournaments, drafts, and selection.
//!
//! Each takes the root by reference and returns a new root. Unknown ids make
//! the call a no-op. Every result already passes [`Root::ensure_valid`]
//! unchanged: draft lists only reference existing drafts owned by the listing
//! tournament, no tournament is left without drafts, and the selected draft
//! belongs to the selected tournament.

use crate::{
  board::Board,
  root::{DEFAULT_DRAFT_NAME, Draft, Root, Tournament},
};

/// Prefix for the names of duplicated drafts and tournaments.
pub const COPY_PREFIX: &str = "Copy of ";

fn clean(name: Option<&str>) -> Option<String> {
  name.map(str::trim).filter(|n| !n.is_empty()).map(str::to_owned)
}

impl Root {
  fn select(&mut self, tournament_id: &str, draft_id: &str) {
    self.ui.current_tournament_id = tournament_id.to_owned();
    self.ui.current_draft_id = draft_id.to_owned();
  }

  /// Select `tournament_id` and its first draft.
  fn select_first_of(&mut self, tournament_id: &str) {
    let first = self
      .tournaments
      .get(tournament_id)
      .and_then(|t| t.draft_ids.first())
      .cloned()
      .unwrap_or_default();
    self.select(tournament_id, &first);
  }

  // ── Tournaments ─────────────────────────────────────────────────────────

  /// Create a tournament holding one empty draft and select both.
  pub fn add_tournament(&self, name: Option<&str>) -> Root {
    let mut next = self.clone();
    let name = clean(name)
      .unwrap_or_else(|| format!("Tournament {}", next.tournaments.len() + 1));
    let tournament = Tournament::new(name);
    let tid = tournament.id.clone();
    next.tournaments.insert(tid.clone(), tournament);

    let draft = Draft::new(tid.clone(), DEFAULT_DRAFT_NAME, Board::empty());
    let did = draft.id.clone();
    next.insert_draft(draft);
    next.select(&tid, &did);
    next
  }

  pub fn rename_tournament(&self, id: &str, name: &str) -> Root {
    let mut next = self.clone();
    if let (Some(t), Some(name)) = (next.tournaments.get_mut(id), clean(Some(name))) {
      t.name = name;
      t.updated_at = crate::now();
    }
    next
  }

  /// Delete a tournament and every draft it owns.
  ///
  /// Deleting the last tournament yields a fresh default root.
  pub fn delete_tournament(&self, id: &str) -> Root {
    let mut next = self.clone();
    let Some(tournament) = next.tournaments.shift_remove(id) else {
      return next;
    };
    next
      .drafts
      .retain(|did, d| d.tournament_id != id && !tournament.draft_ids.contains(did));

    let Some(first) = next.tournaments.keys().next().cloned() else {
      return Root::new_default();
    };
    next.select_first_of(&first);
    next
  }

  /// Copy a tournament and all of its drafts under fresh ids, then select
  /// the copy.
  pub fn duplicate_tournament(&self, id: &str) -> Root {
    let mut next = self.clone();
    let Some(source) = next.tournaments.get(id).cloned() else {
      return next;
    };
    let copy = Tournament::new(format!("{COPY_PREFIX}{}", source.name));
    let tid = copy.id.clone();
    next.tournaments.insert(tid.clone(), copy);

    for did in &source.draft_ids {
      let Some(src) = self.drafts.get(did) else { continue };
      next.insert_draft(Draft::new(tid.clone(), src.name.clone(), src.board.clone()));
    }
    if next.tournaments[&tid].draft_ids.is_empty() {
      next.insert_draft(Draft::new(tid.clone(), DEFAULT_DRAFT_NAME, Board::empty()));
    }
    next.select_first_of(&tid);
    next
  }

  /// Create a tournament from a list of named boards, as read from a
  /// tournament bundle, and select it.
  pub fn import_tournament(&self, name: &str, drafts: Vec<(String, Board)>) -> Root {
    let mut next = self.clone();
    let name = clean(Some(name))
      .unwrap_or_else(|| format!("Tournament {}", next.tournaments.len() + 1));
    let tournament = Tournament::new(name);
    let tid = tournament.id.clone();
    next.tournaments.insert(tid.clone(), tournament);

    for (i, (draft_name, board)) in drafts.into_iter().enumerate() {
      let draft_name =
        clean(Some(&draft_name)).unwrap_or_else(|| format!("Draft {}", i + 1));
      next.insert_draft(Draft::new(tid.clone(), draft_name, board.normalized()));
    }
    if next.tournaments[&tid].draft_ids.is_empty() {
      next.insert_draft(Draft::new(tid.clone(), DEFAULT_DRAFT_NAME, Board::empty()));
    }
    next.select_first_of(&tid);
    next
  }

  // ── Drafts ──────────────────────────────────────────────────────────────

  /// Append an empty draft to a tournament and select it.
  pub fn add_draft(&self, tournament_id: &str, name: Option<&str>) -> Root {
    self.add_draft_with_board(tournament_id, name, &Board::empty())
  }

  /// Append a draft seeded from `board` (normalized first) and select it.
  pub fn add_draft_with_board(
    &self,
    tournament_id: &str,
    name: Option<&str>,
    board: &Board,
  ) -> Root {
    let mut next = self.clone();
    let Some(t) = next.tournaments.get(tournament_id) else {
      return next;
    };
    let name =
      clean(name).unwrap_or_else(|| format!("Draft {}", t.draft_ids.len() + 1));
    let draft = Draft::new(tournament_id, name, board.normalized());
    let did = draft.id.clone();
    next.insert_draft(draft);
    next.select(tournament_id, &did);
    next
  }

  pub fn rename_draft(&self, id: &str, name: &str) -> Root {
    let mut next = self.clone();
    if let (Some(d), Some(name)) = (next.drafts.get_mut(id), clean(Some(name))) {
      d.name = name;
      d.updated_at = crate::now();
    }
    next
  }

  /// Delete a draft. A tournament left without drafts gets a fresh
  /// "Draft 1" with the sample roster.
  pub fn delete_draft(&self, id: &str) -> Root {
    let mut next = self.clone();
    let Some(draft) = next.drafts.shift_remove(id) else {
      return next;
    };
    let tid = draft.tournament_id;
    let Some(t) = next.tournaments.get_mut(&tid) else {
      return next.ensure_valid();
    };
    t.draft_ids.retain(|d| d != id);
    if t.draft_ids.is_empty() {
      next.insert_draft(Draft::new(tid.clone(), DEFAULT_DRAFT_NAME, Board::sample()));
    }
    next.select_first_of(&tid);
    next
  }

  /// Copy a draft next to the original and select the copy.
  pub fn duplicate_draft(&self, id: &str) -> Root {
    let mut next = self.clone();
    let Some(src) = next.drafts.get(id) else {
      return next;
    };
    let copy = Draft::new(
      src.tournament_id.clone(),
      format!("{COPY_PREFIX}{}", src.name),
      src.board.clone(),
    );
    let (tid, did) = (copy.tournament_id.clone(), copy.id.clone());
    next.insert_draft(copy);
    next.select(&tid, &did);
    next
  }

  /// Detach a draft from its tournament and append it to `target`.
  ///
  /// The source tournament gets an empty "Draft 1" if this was its last
  /// draft.
  pub fn move_draft(&self, draft_id: &str, target: &str) -> Root {
    let mut next = self.clone();
    if !next.tournaments.contains_key(target) {
      return next;
    }
    let Some(draft) = next.drafts.get_mut(draft_id) else {
      return next;
    };
    let source = std::mem::replace(&mut draft.tournament_id, target.to_owned());
    draft.updated_at = crate::now();

    if let Some(t) = next.tournaments.get_mut(&source) {
      t.draft_ids.retain(|d| d != draft_id);
    }
    if let Some(t) = next.tournaments.get_mut(target) {
      t.draft_ids.push(draft_id.to_owned());
    }
    if next
      .tournaments
      .get(&source)
      .is_some_and(|t| t.draft_ids.is_empty())
    {
      next.insert_draft(Draft::new(source, DEFAULT_DRAFT_NAME, Board::empty()));
    }
    next.select(target, draft_id);
    next
  }

  // ── Selection ───────────────────────────────────────────────────────────

  pub fn select_tournament(&self, id: &str) -> Root {
    let mut next = self.clone();
    if next.tournaments.contains_key(id) {
      next.select_first_of(id);
    }
    next
  }

  pub fn select_draft(&self, id: &str) -> Root {
    let mut next = self.clone();
    if let Some(tid) = next.drafts.get(id).map(|d| d.tournament_id.clone()) {
      next.select(&tid, id);
    }
    next
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::board::Bucket;

  fn assert_valid(root: &Root) {
    assert_eq!(&root.ensure_valid(), root);
    for t in root.tournaments.values() {
      assert!(!t.draft_ids.is_empty(), "tournament {} has no drafts", t.id);
      for did in &t.draft_ids {
        assert_eq!(root.drafts[did].tournament_id, t.id);
      }
    }
    let d = root.current_draft().unwrap();
    assert_eq!(d.tournament_id, root.ui.current_tournament_id);
  }

  fn current_tid(root: &Root) -> String { root.ui.current_tournament_id.clone() }

  #[test]
  fn add_tournament_selects_new_tournament_and_empty_draft() {
    let root = Root::new_default().add_tournament(None);
    assert_valid(&root);
    let t = root.current_tournament().unwrap();
    assert_eq!(t.name, "Tournament 2");
    assert_eq!(t.draft_ids.len(), 1);
    let d = root.current_draft().unwrap();
    assert_eq!(d.name, DEFAULT_DRAFT_NAME);
    assert!(d.board.players.is_empty());
  }

  #[test]
  fn add_draft_appends_and_selects() {
    let root = Root::new_default();
    let tid = current_tid(&root);
    let next = root.add_draft(&tid, Some("  Scouting  "));
    assert_valid(&next);
    assert_eq!(next.tournaments[&tid].draft_ids.len(), 2);
    assert_eq!(next.current_draft().unwrap().name, "Scouting");

    let unnamed = next.add_draft(&tid, None);
    assert_eq!(unnamed.current_draft().unwrap().name, "Draft 3");
  }

  #[test]
  fn add_draft_to_unknown_tournament_is_noop() {
    let root = Root::new_default();
    assert_eq!(root.add_draft("nope", None), root);
  }

  #[test]
  fn add_draft_with_board_normalizes_input() {
    let root = Root::new_default();
    let tid = current_tid(&root);
    let mut board = Board::empty().add_player("Kai", "");
    board.buckets.no.push("dangling".into());
    board.titles.yes = String::new();

    let next = root.add_draft_with_board(&tid, Some("Imported"), &board);
    assert_valid(&next);
    let seeded = next.current_board().unwrap();
    assert!(seeded.buckets.no.is_empty());
    assert_eq!(seeded.titles.yes, "YES");
    assert_eq!(seeded.players.len(), 1);
  }

  #[test]
  fn rename_ignores_blank_and_unknown() {
    let root = Root::new_default();
    let tid = current_tid(&root);
    let did = root.ui.current_draft_id.clone();

    let renamed = root.rename_tournament(&tid, "Cup").rename_draft(&did, "Final");
    assert_eq!(renamed.tournaments[&tid].name, "Cup");
    assert_eq!(renamed.drafts[&did].name, "Final");

    let blank = renamed.rename_tournament(&tid, "   ");
    assert_eq!(blank.tournaments[&tid].name, "Cup");
    assert_eq!(renamed.rename_draft("nope", "x"), renamed);
  }

  #[test]
  fn delete_tournament_cascades_to_its_drafts() {
    let root = Root::new_default().add_tournament(Some("Doomed"));
    let doomed = current_tid(&root);
    let root = root.add_draft(&doomed, None);
    let doomed_drafts = root.tournaments[&doomed].draft_ids.clone();
    assert_eq!(doomed_drafts.len(), 2);

    let next = root.delete_tournament(&doomed);
    assert_valid(&next);
    assert!(!next.tournaments.contains_key(&doomed));
    for did in &doomed_drafts {
      assert!(!next.drafts.contains_key(did));
    }
    assert_eq!(next.drafts.len(), 1);
  }

  #[test]
  fn deleting_last_tournament_yields_default_root() {
    let root = Root::new_default();
    let next = root.delete_tournament(&current_tid(&root));
    assert_valid(&next);
    assert_eq!(next.tournaments.len(), 1);
    assert_ne!(next.ui.current_tournament_id, root.ui.current_tournament_id);
    assert_eq!(next.current_board().unwrap().players.len(), 8);
  }

  #[test]
  fn delete_draft_reselects_first_remaining() {
    let root = Root::new_default();
    let tid = current_tid(&root);
    let first = root.ui.current_draft_id.clone();
    let root = root.add_draft(&tid, Some("Second"));
    let second = root.ui.current_draft_id.clone();

    let next = root.delete_draft(&second);
    assert_valid(&next);
    assert_eq!(next.ui.current_draft_id, first);
    assert_eq!(next.tournaments[&tid].draft_ids, vec![first]);
  }

  #[test]
  fn delete_only_draft_synthesizes_sample_draft() {
    let root = Root::new_default();
    let did = root.ui.current_draft_id.clone();
    let next = root.delete_draft(&did);
    assert_valid(&next);
    assert!(!next.drafts.contains_key(&did));
    let d = next.current_draft().unwrap();
    assert_eq!(d.name, DEFAULT_DRAFT_NAME);
    assert_eq!(d.board.players.len(), 8);
  }

  #[test]
  fn duplicate_draft_deep_copies_under_new_id() {
    let root = Root::new_default();
    let did = root.ui.current_draft_id.clone();
    let next = root.duplicate_draft(&did);
    assert_valid(&next);

    let copy = next.current_draft().unwrap();
    assert_ne!(copy.id, did);
    assert_eq!(copy.name, "Copy of Draft 1");
    assert_eq!(copy.board, root.drafts[&did].board);

    // Editing the copy leaves the original alone.
    let mut edited = next.clone();
    let copy_id = copy.id.clone();
    let alice = edited.drafts[&copy_id].board.available_order[0].clone();
    let board = edited.drafts[&copy_id].board.assign_to_bucket(&alice, Bucket::Yes);
    edited.drafts.get_mut(&copy_id).unwrap().board = board;
    assert!(edited.drafts[&did].board.buckets.yes.is_empty());
  }

  #[test]
  fn duplicate_tournament_reparents_copied_drafts() {
    let root = Root::new_default();
    let tid = current_tid(&root);
    let root = root.add_draft(&tid, Some("Second"));

    let next = root.duplicate_tournament(&tid);
    assert_valid(&next);
    let copy = next.current_tournament().unwrap();
    assert_eq!(copy.name, "Copy of My Tournament");
    assert_eq!(copy.draft_ids.len(), 2);
    for did in &copy.draft_ids {
      assert!(!root.drafts.contains_key(did));
      assert_eq!(next.drafts[did].tournament_id, copy.id);
    }
    let names: Vec<_> = next
      .drafts_of(&copy.id)
      .iter()
      .map(|d| d.name.clone())
      .collect();
    assert_eq!(names, ["Draft 1", "Second"]);
    assert_eq!(next.ui.current_draft_id, copy.draft_ids[0]);
  }

  #[test]
  fn move_draft_between_tournaments() {
    let root = Root::new_default();
    let home = current_tid(&root);
    let moving = root.ui.current_draft_id.clone();
    let root = root.add_draft(&home, Some("Stays"));
    let root = root.add_tournament(Some("Away"));
    let away = current_tid(&root);

    let next = root.move_draft(&moving, &away);
    assert_valid(&next);
    assert_eq!(next.drafts[&moving].tournament_id, away);
    assert_eq!(next.tournaments[&away].draft_ids.last(), Some(&moving));
    assert!(!next.tournaments[&home].draft_ids.contains(&moving));
    assert_eq!(next.ui.current_tournament_id, away);
    assert_eq!(next.ui.current_draft_id, moving);
  }

  #[test]
  fn moving_last_draft_leaves_source_with_an_empty_draft() {
    let root = Root::new_default();
    let home = current_tid(&root);
    let moving = root.ui.current_draft_id.clone();
    let root = root.add_tournament(Some("Away"));
    let away = current_tid(&root);

    let next = root.move_draft(&moving, &away);
    assert_valid(&next);
    assert_eq!(next.tournaments[&home].draft_ids.len(), 1);
    assert_eq!(next.move_draft(&moving, "nope"), next);
    assert_eq!(next.move_draft("nope", &home), next);
  }

  #[test]
  fn select_draft_also_selects_its_tournament() {
    let root = Root::new_default();
    let first_did = root.ui.current_draft_id.clone();
    let first_tid = current_tid(&root);
    let root = root.add_tournament(None);

    let next = root.select_draft(&first_did);
    assert_valid(&next);
    assert_eq!(next.ui.current_tournament_id, first_tid);

    let back = next.select_tournament(&current_tid(&root));
    assert_valid(&back);
    assert_eq!(back.ui.current_draft_id, root.ui.current_draft_id);
  }

  #[test]
  fn import_tournament_creates_drafts_with_fresh_ids() {
    let root = Root::new_default();
    let boards = vec![
      ("Round 1".to_string(), Board::sample()),
      (String::new(), Board::empty()),
    ];
    let next = root.import_tournament("Imported Cup", boards);
    assert_valid(&next);
    let t = next.current_tournament().unwrap();
    assert_eq!(t.name, "Imported Cup");
    let names: Vec<_> = next.drafts_of(&t.id).iter().map(|d| d.name.clone()).collect();
    assert_eq!(names, ["Round 1", "Draft 2"]);
  }
}
