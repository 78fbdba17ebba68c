//! An editing session over a [`Root`]: applies board mutations to the current
//! draft and keeps the one-level undo snapshot.

use serde::Serialize;

use crate::{
  board::Board,
  history::UndoSlot,
  root::{DraftId, Root},
};

/// The board of one draft as it was before the most recent board mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
  pub draft_id: DraftId,
  pub board:    Board,
}

#[derive(Debug, Clone)]
pub struct Session {
  root: Root,
  undo: UndoSlot<Snapshot>,
}

impl Session {
  pub fn new(root: Root) -> Self { Self::with_snapshot(root, None) }

  /// Resume a session whose undo snapshot was persisted separately.
  pub fn with_snapshot(root: Root, snapshot: Option<Snapshot>) -> Self {
    Self { root, undo: UndoSlot::with(snapshot) }
  }

  pub fn root(&self) -> &Root { &self.root }

  pub fn board(&self) -> Option<&Board> { self.root.current_board() }

  pub fn snapshot(&self) -> Option<&Snapshot> { self.undo.peek() }

  pub fn can_undo(&self) -> bool { !self.undo.is_empty() }

  /// Replace the current draft's board with `f(board)`, snapshotting the old
  /// board first. Returns `false` when no draft is selected.
  pub fn edit_board<F>(&mut self, f: F) -> bool
  where
    F: FnOnce(&Board) -> Board,
  {
    let Some(draft) = self.root.drafts.get_mut(&self.root.ui.current_draft_id)
    else {
      return false;
    };
    let next = f(&draft.board);
    let previous = std::mem::replace(&mut draft.board, next);
    draft.updated_at = crate::now();
    self.undo.record(Snapshot { draft_id: draft.id.clone(), board: previous });
    true
  }

  /// Replace the root with `f(root)`. Tournament and draft changes are not
  /// undoable.
  pub fn organize<F>(&mut self, f: F)
  where
    F: FnOnce(&Root) -> Root,
  {
    self.root = f(&self.root);
  }

  /// Restore the most recent snapshot. Returns `false` when there is nothing
  /// to undo or the snapshot's draft no longer exists.
  pub fn undo(&mut self) -> bool {
    let Some(snapshot) = self.undo.take() else {
      return false;
    };
    match self.root.drafts.get_mut(&snapshot.draft_id) {
      Some(draft) => {
        draft.board = snapshot.board;
        draft.updated_at = crate::now();
        true
      }
      None => false,
    }
  }

  pub fn into_parts(self) -> (Root, Option<Snapshot>) {
    let Self { root, mut undo } = self;
    (root, undo.take())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn add_player_then_undo_restores_exact_board() {
    let mut session = Session::new(Root::new_default());
    let before = session.board().unwrap().clone();

    assert!(session.edit_board(|b| b.add_player("Zoe", "")));
    assert_eq!(session.board().unwrap().players.len(), 9);

    assert!(session.undo());
    assert_eq!(session.board().unwrap(), &before);

    assert!(!session.undo());
    assert_eq!(session.board().unwrap(), &before);
  }

  #[test]
  fn only_the_last_edit_is_undoable() {
    let mut session = Session::new(Root::new_default());
    session.edit_board(|b| b.add_player("One", ""));
    let after_first = session.board().unwrap().clone();
    session.edit_board(|b| b.add_player("Two", ""));

    assert!(session.undo());
    assert_eq!(session.board().unwrap(), &after_first);
    assert!(!session.can_undo());
  }

  #[test]
  fn undo_targets_the_draft_it_was_taken_from() {
    let mut session = Session::new(Root::new_default());
    let first_draft = session.root().ui.current_draft_id.clone();
    let original = session.board().unwrap().clone();
    session.edit_board(|b| b.add_player("Zoe", ""));

    let tid = session.root().ui.current_tournament_id.clone();
    session.organize(|r| r.add_draft(&tid, Some("Other")));
    assert_ne!(session.root().ui.current_draft_id, first_draft);

    assert!(session.undo());
    assert_eq!(session.root().drafts[&first_draft].board, original);
    assert!(session.board().unwrap().players.is_empty());
  }

  #[test]
  fn undo_after_draft_deleted_is_consumed() {
    let mut session = Session::new(Root::new_default());
    session.edit_board(|b| b.add_player("Zoe", ""));
    let did = session.root().ui.current_draft_id.clone();
    session.organize(|r| r.delete_draft(&did));

    assert!(!session.undo());
    assert!(!session.can_undo());
  }
}
