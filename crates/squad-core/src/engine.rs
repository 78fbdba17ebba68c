//! Board mutation engine.
//!
//! Every operation takes the current board by reference and returns the next
//! one; the input is never modified. Unknown player ids are silent no-ops so
//! the single-membership invariant holds after any sequence of calls.

use strum::IntoEnumIterator;

use crate::{
  board::{Board, Bucket, ListKey},
  player::{Player, PlayerId},
};

/// A drag-and-drop move as reported by a possibly filtered view.
///
/// `index` is a position in the *visible* destination list, not in the full
/// list stored on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drag {
  pub player_id: PlayerId,
  pub from:      ListKey,
  pub to:        ListKey,
  pub index:     usize,
}

impl Board {
  fn strip(&mut self, id: &str) {
    for key in ListKey::iter() {
      self.list_mut(key).retain(|x| x != id);
    }
  }

  fn strip_buckets(&mut self, id: &str) {
    for bucket in Bucket::iter() {
      self.list_mut(bucket.into()).retain(|x| x != id);
    }
  }

  // ── Players ─────────────────────────────────────────────────────────────

  /// Add a new player with a fresh id at the top of the available pool.
  pub fn add_player(&self, name: &str, notes: &str) -> Board {
    self.insert_player(Player::new(name, notes))
  }

  /// Insert `player` at the top of the available pool, replacing any record
  /// with the same id.
  pub fn insert_player(&self, player: Player) -> Board {
    let mut next = self.clone();
    next.strip(&player.id);
    next.available_order.insert(0, player.id.clone());
    next.players.insert(player.id.clone(), player);
    next
  }

  /// Insert each of `players` in turn, so the last one ends up first.
  pub fn add_players<I>(&self, players: I) -> Board
  where
    I: IntoIterator<Item = Player>,
  {
    let mut next = self.clone();
    for player in players {
      next.strip(&player.id);
      next.available_order.insert(0, player.id.clone());
      next.players.insert(player.id.clone(), player);
    }
    next
  }

  /// Replace the stored record for `updated.id`. List membership is
  /// unchanged.
  pub fn edit_player(&self, updated: Player) -> Board {
    let mut next = self.clone();
    if let Some(slot) = next.players.get_mut(&updated.id) {
      *slot = updated;
    }
    next
  }

  /// Hard delete: drop the record and every list reference to it.
  pub fn remove_player(&self, id: &str) -> Board {
    let mut next = self.clone();
    next.players.shift_remove(id);
    next.strip(id);
    next
  }

  /// Take `id` out of every bucket and put it at the top of the available
  /// pool unless it is already there.
  pub fn send_to_available(&self, id: &str) -> Board {
    let mut next = self.clone();
    if !next.players.contains_key(id) {
      return next;
    }
    next.strip_buckets(id);
    if !next.available_order.iter().any(|x| x == id) {
      next.available_order.insert(0, id.to_owned());
    }
    next
  }

  /// The board's "remove" action: delete a player sitting in the available
  /// pool, otherwise send it back there.
  pub fn remove_or_release(&self, id: &str) -> Board {
    if self.available_order.iter().any(|x| x == id) {
      self.remove_player(id)
    } else {
      self.send_to_available(id)
    }
  }

  /// Move `id` to the top of `bucket`, out of every other list.
  pub fn assign_to_bucket(&self, id: &str, bucket: Bucket) -> Board {
    let mut next = self.clone();
    if !next.players.contains_key(id) {
      return next;
    }
    next.strip(id);
    next.list_mut(bucket.into()).insert(0, id.to_owned());
    next
  }

  // ── Lists ───────────────────────────────────────────────────────────────

  /// Set the display title of a list; blank input restores the default.
  pub fn rename_list(&self, key: ListKey, title: &str) -> Board {
    let mut next = self.clone();
    let title = title.trim();
    *next.titles.get_mut(key) = if title.is_empty() {
      key.default_title().to_owned()
    } else {
      title.to_owned()
    };
    next
  }

  /// Apply a drag against `view`, the projection the user was looking at when
  /// they dropped.
  ///
  /// The visible destination index is translated into the full list through
  /// an anchor: the id shown at the drop position (ignoring the dragged id
  /// itself for same-list moves). The dragged id is inserted directly before
  /// that anchor in the full list, or at the end when the drop was past the
  /// last visible item.
  pub fn reorder(&self, drag: &Drag, view: &Board) -> Board {
    let mut next = self.clone();
    let id = &drag.player_id;
    if !self.list(drag.from).contains(id) {
      return next;
    }

    let anchor: Option<&PlayerId> = view
      .list(drag.to)
      .iter()
      .filter(|x| *x != id)
      .nth(drag.index);

    next.list_mut(drag.from).retain(|x| x != id);
    let dest = next.list_mut(drag.to);
    let at = anchor
      .and_then(|a| dest.iter().position(|x| x == a))
      .unwrap_or(dest.len());
    dest.insert(at, id.clone());
    next
  }

  /// [`Board::reorder`] against the view produced by `query`.
  pub fn reorder_filtered(&self, drag: &Drag, query: &str) -> Board {
    self.reorder(drag, &self.filtered(query))
  }

  // ── Search ──────────────────────────────────────────────────────────────

  /// Read-side projection for a search query.
  ///
  /// Keeps players whose name or notes contain `query` (case-insensitive)
  /// and removes everyone else from the lists, preserving order. An empty
  /// query returns the board unchanged.
  pub fn filtered(&self, query: &str) -> Board {
    if query.is_empty() {
      return self.clone();
    }
    let needle = query.to_lowercase();

    let mut view = self.clone();
    view.players.retain(|_, p| p.matches(&needle));
    for key in ListKey::iter() {
      let players = &view.players;
      let list = match key {
        ListKey::Available => &mut view.available_order,
        ListKey::Yes => &mut view.buckets.yes,
        ListKey::Maybe => &mut view.buckets.maybe,
        ListKey::No => &mut view.buckets.no,
      };
      list.retain(|id| players.contains_key(id));
    }
    view
  }
}
