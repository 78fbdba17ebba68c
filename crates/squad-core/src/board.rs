//! Board — a roster partitioned into the available pool and three buckets.
//!
//! Every player id in `players` appears in exactly one of the four lists, and
//! every id in a list exists in `players`. Order within a list is the user's
//! ranking and is never sorted.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::player::{Player, PlayerId};

/// Names used when the sample roster is generated for a fresh board.
pub const SAMPLE_NAMES: [&str; 8] = [
  "Alice", "Bob", "Charlie", "Deepa", "Ethan", "Fatima", "Ganesh", "Hana",
];

// ─── List keys ───────────────────────────────────────────────────────────────

/// One of the three decision lists.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Bucket {
  Yes,
  Maybe,
  No,
}

/// Any of the four lists on a board.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ListKey {
  Available,
  Yes,
  Maybe,
  No,
}

impl ListKey {
  /// The bucket this list represents, or `None` for the available pool.
  pub fn bucket(self) -> Option<Bucket> {
    match self {
      Self::Available => None,
      Self::Yes => Some(Bucket::Yes),
      Self::Maybe => Some(Bucket::Maybe),
      Self::No => Some(Bucket::No),
    }
  }

  /// The label shown when a title is missing or blank.
  pub fn default_title(self) -> &'static str {
    match self {
      Self::Available => "Available",
      Self::Yes => "YES",
      Self::Maybe => "MAYBE",
      Self::No => "NO",
    }
  }
}

impl From<Bucket> for ListKey {
  fn from(bucket: Bucket) -> Self {
    match bucket {
      Bucket::Yes => Self::Yes,
      Bucket::Maybe => Self::Maybe,
      Bucket::No => Self::No,
    }
  }
}

// ─── Board ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Buckets {
  pub yes:   Vec<PlayerId>,
  pub maybe: Vec<PlayerId>,
  pub no:    Vec<PlayerId>,
}

/// Display labels for the four lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Titles {
  pub available: String,
  pub yes:       String,
  pub maybe:     String,
  pub no:        String,
}

impl Default for Titles {
  fn default() -> Self {
    Self {
      available: ListKey::Available.default_title().to_owned(),
      yes:       ListKey::Yes.default_title().to_owned(),
      maybe:     ListKey::Maybe.default_title().to_owned(),
      no:        ListKey::No.default_title().to_owned(),
    }
  }
}

impl Titles {
  pub fn get(&self, key: ListKey) -> &str {
    match key {
      ListKey::Available => &self.available,
      ListKey::Yes => &self.yes,
      ListKey::Maybe => &self.maybe,
      ListKey::No => &self.no,
    }
  }

  pub(crate) fn get_mut(&mut self, key: ListKey) -> &mut String {
    match key {
      ListKey::Available => &mut self.available,
      ListKey::Yes => &mut self.yes,
      ListKey::Maybe => &mut self.maybe,
      ListKey::No => &mut self.no,
    }
  }
}

/// The working set of one draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
  pub players:         IndexMap<PlayerId, Player>,
  pub available_order: Vec<PlayerId>,
  pub buckets:         Buckets,
  pub titles:          Titles,
}

impl Board {
  /// A board with no players and default titles.
  pub fn empty() -> Self { Self::default() }

  /// A board pre-populated with the fixed sample roster, all available.
  pub fn sample() -> Self {
    let mut board = Self::empty();
    for name in SAMPLE_NAMES {
      let player = Player::new(name, "");
      board.available_order.push(player.id.clone());
      board.players.insert(player.id.clone(), player);
    }
    board
  }

  pub fn list(&self, key: ListKey) -> &[PlayerId] {
    match key {
      ListKey::Available => &self.available_order,
      ListKey::Yes => &self.buckets.yes,
      ListKey::Maybe => &self.buckets.maybe,
      ListKey::No => &self.buckets.no,
    }
  }

  pub(crate) fn list_mut(&mut self, key: ListKey) -> &mut Vec<PlayerId> {
    match key {
      ListKey::Available => &mut self.available_order,
      ListKey::Yes => &mut self.buckets.yes,
      ListKey::Maybe => &mut self.buckets.maybe,
      ListKey::No => &mut self.buckets.no,
    }
  }

  /// Which list currently holds `id`, if any.
  pub fn locate(&self, id: &str) -> Option<ListKey> {
    ListKey::iter().find(|key| self.list(*key).iter().any(|x| x == id))
  }

  /// Number of ids in each list, in display order.
  pub fn counts(&self) -> [(ListKey, usize); 4] {
    [
      (ListKey::Available, self.available_order.len()),
      (ListKey::Yes, self.buckets.yes.len()),
      (ListKey::Maybe, self.buckets.maybe.len()),
      (ListKey::No, self.buckets.no.len()),
    ]
  }

  /// Return a structurally valid copy of this board. Idempotent.
  pub fn normalized(&self) -> Self {
    let mut next = self.clone();
    next.repair();
    next
  }

  /// Restore the single-membership invariant and fill in blank titles.
  ///
  /// Ids missing from `players` are dropped, an id listed more than once
  /// keeps only its first position (scanning available, yes, maybe, no), and
  /// players listed nowhere are appended to the available pool.
  pub(crate) fn repair(&mut self) {
    for (id, player) in self.players.iter_mut() {
      if player.id != *id {
        player.id = id.clone();
      }
    }

    let mut seen: HashSet<PlayerId> = HashSet::new();
    for key in ListKey::iter() {
      let players = &self.players;
      let list = match key {
        ListKey::Available => &mut self.available_order,
        ListKey::Yes => &mut self.buckets.yes,
        ListKey::Maybe => &mut self.buckets.maybe,
        ListKey::No => &mut self.buckets.no,
      };
      list.retain(|id| players.contains_key(id) && seen.insert(id.clone()));
    }

    let orphans: Vec<PlayerId> = self
      .players
      .keys()
      .filter(|id| !seen.contains(*id))
      .cloned()
      .collect();
    self.available_order.extend(orphans);

    for key in ListKey::iter() {
      let title = self.titles.get_mut(key);
      if title.trim().is_empty() {
        *title = key.default_title().to_owned();
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ids(board: &Board) -> Vec<PlayerId> { board.players.keys().cloned().collect() }

  #[test]
  fn sample_board_has_eight_available_players() {
    let board = Board::sample();
    assert_eq!(board.players.len(), 8);
    assert_eq!(board.available_order, ids(&board));
    assert!(board.buckets.yes.is_empty());
    let names: Vec<_> = board.players.values().map(|p| p.name.as_str()).collect();
    assert_eq!(names, SAMPLE_NAMES);
  }

  #[test]
  fn list_keys_parse_case_insensitively() {
    assert_eq!("YES".parse::<ListKey>().unwrap(), ListKey::Yes);
    assert_eq!("Available".parse::<ListKey>().unwrap(), ListKey::Available);
    assert_eq!("maybe".parse::<Bucket>().unwrap(), Bucket::Maybe);
    assert!("available".parse::<Bucket>().is_err());
    assert_eq!(ListKey::No.to_string(), "no");
  }

  #[test]
  fn repair_drops_dangling_and_duplicate_ids() {
    let mut board = Board::sample();
    let first = board.available_order[0].clone();
    board.buckets.yes.push(first.clone());
    board.buckets.no.push("ghost".into());

    let fixed = board.normalized();
    assert_eq!(fixed.locate(&first), Some(ListKey::Available));
    assert!(fixed.buckets.yes.is_empty());
    assert!(fixed.buckets.no.is_empty());
  }

  #[test]
  fn repair_appends_unlisted_players_to_available() {
    let mut board = Board::sample();
    let dropped = board.available_order.remove(0);

    let fixed = board.normalized();
    assert_eq!(fixed.available_order.last(), Some(&dropped));
    assert_eq!(fixed.available_order.len(), 8);
  }

  #[test]
  fn repair_fills_blank_titles() {
    let mut board = Board::empty();
    board.titles.maybe = "   ".into();
    let fixed = board.normalized();
    assert_eq!(fixed.titles.maybe, "MAYBE");
    assert_eq!(fixed.normalized(), fixed);
  }
}
