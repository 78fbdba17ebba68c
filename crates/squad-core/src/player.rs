//! Player — a single roster entry.

use serde::{Deserialize, Serialize};

pub type PlayerId = String;

/// One entry on a board. Owned by exactly one [`crate::board::Board`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
  pub id:    PlayerId,
  pub name:  String,
  pub notes: String,
}

impl Player {
  /// A new player with a freshly generated id.
  pub fn new(name: impl Into<String>, notes: impl Into<String>) -> Self {
    Self {
      id:    crate::new_id(),
      name:  name.into(),
      notes: notes.into(),
    }
  }

  /// Case-insensitive substring match over name and notes.
  ///
  /// `needle` must already be lowercased.
  pub(crate) fn matches(&self, needle: &str) -> bool {
    format!("{} {}", self.name, self.notes)
      .to_lowercase()
      .contains(needle)
  }
}
