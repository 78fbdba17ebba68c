//! Root — the whole persisted tree of tournaments, drafts, and the current
//! selection.
//!
//! The root exclusively owns every [`Tournament`] and [`Draft`]. Tournaments
//! refer to their drafts by id only; all lookups go through [`Root::drafts`].

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::board::Board;

pub type TournamentId = String;
pub type DraftId = String;

/// Value of the `version` field written with every root.
pub const SCHEMA_VERSION: u32 = 2;

pub const DEFAULT_TOURNAMENT_NAME: &str = "My Tournament";
pub const DEFAULT_DRAFT_NAME: &str = "Draft 1";

// ─── Tournament ──────────────────────────────────────────────────────────────

/// A named, ordered group of drafts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
  pub id:         TournamentId,
  pub name:       String,
  pub draft_ids:  Vec<DraftId>,
  #[serde(with = "chrono::serde::ts_milliseconds")]
  pub created_at: DateTime<Utc>,
  #[serde(with = "chrono::serde::ts_milliseconds")]
  pub updated_at: DateTime<Utc>,
}

impl Tournament {
  pub fn new(name: impl Into<String>) -> Self {
    let at = crate::now();
    Self {
      id:         crate::new_id(),
      name:       name.into(),
      draft_ids:  Vec::new(),
      created_at: at,
      updated_at: at,
    }
  }
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// A named board belonging to exactly one tournament.
///
/// Serialised with the board fields flattened into the draft object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
  pub id:            DraftId,
  pub tournament_id: TournamentId,
  pub name:          String,
  #[serde(with = "chrono::serde::ts_milliseconds")]
  pub created_at:    DateTime<Utc>,
  #[serde(with = "chrono::serde::ts_milliseconds")]
  pub updated_at:    DateTime<Utc>,
  #[serde(flatten)]
  pub board:         Board,
}

impl Draft {
  pub fn new(
    tournament_id: impl Into<TournamentId>,
    name: impl Into<String>,
    board: Board,
  ) -> Self {
    let at = crate::now();
    Self {
      id: crate::new_id(),
      tournament_id: tournament_id.into(),
      name: name.into(),
      created_at: at,
      updated_at: at,
      board,
    }
  }
}

// ─── Root ────────────────────────────────────────────────────────────────────

/// Which tournament and draft the user is looking at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
  pub current_tournament_id: TournamentId,
  pub current_draft_id:      DraftId,
}

/// The entire persisted application state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Root {
  pub version:     u32,
  pub tournaments: IndexMap<TournamentId, Tournament>,
  pub drafts:      IndexMap<DraftId, Draft>,
  pub ui:          Selection,
}

impl Root {
  /// First-run state: one tournament holding one draft with the sample
  /// roster.
  pub fn new_default() -> Self { Self::with_board(Board::sample()) }

  /// A root holding a single default-named tournament and draft seeded with
  /// `board`.
  pub fn with_board(board: Board) -> Self {
    let tournament = Tournament::new(DEFAULT_TOURNAMENT_NAME);
    let draft = Draft::new(tournament.id.clone(), DEFAULT_DRAFT_NAME, board);
    let mut root = Self {
      version:     SCHEMA_VERSION,
      tournaments: IndexMap::new(),
      drafts:      IndexMap::new(),
      ui:          Selection {
        current_tournament_id: tournament.id.clone(),
        current_draft_id:      draft.id.clone(),
      },
    };
    root.tournaments.insert(tournament.id.clone(), tournament);
    root.insert_draft(draft);
    root
  }

  pub fn current_tournament(&self) -> Option<&Tournament> {
    self.tournaments.get(&self.ui.current_tournament_id)
  }

  pub fn current_draft(&self) -> Option<&Draft> {
    self.drafts.get(&self.ui.current_draft_id)
  }

  pub fn current_board(&self) -> Option<&Board> {
    self.current_draft().map(|d| &d.board)
  }

  /// The drafts of `tournament_id`, in the tournament's order.
  pub fn drafts_of(&self, tournament_id: &str) -> Vec<&Draft> {
    self
      .tournaments
      .get(tournament_id)
      .map(|t| {
        t.draft_ids
          .iter()
          .filter_map(|id| self.drafts.get(id))
          .collect()
      })
      .unwrap_or_default()
  }

  /// Add `draft` to the map and append it to its owner's `draft_ids`.
  pub(crate) fn insert_draft(&mut self, draft: Draft) {
    if let Some(t) = self.tournaments.get_mut(&draft.tournament_id) {
      t.draft_ids.push(draft.id.clone());
    }
    self.drafts.insert(draft.id.clone(), draft);
  }

  /// Return a structurally valid copy of this root. Idempotent; a root that
  /// is already valid comes back unchanged.
  pub fn ensure_valid(&self) -> Self {
    let mut next = self.clone();
    next.repair();
    next
  }

  pub(crate) fn repair(&mut self) {
    let Some(first_tid) = self.tournaments.keys().next().cloned() else {
      *self = Self::new_default();
      return;
    };
    self.version = SCHEMA_VERSION;

    for (id, t) in self.tournaments.iter_mut() {
      t.id = id.clone();
    }

    // Orphaned drafts move to the first tournament rather than disappearing.
    for (id, d) in self.drafts.iter_mut() {
      d.id = id.clone();
      if !self.tournaments.contains_key(&d.tournament_id) {
        d.tournament_id = first_tid.clone();
      }
    }

    for (tid, t) in self.tournaments.iter_mut() {
      let drafts = &self.drafts;
      let mut seen = HashSet::new();
      t.draft_ids.retain(|did| {
        drafts.get(did).is_some_and(|d| d.tournament_id == *tid)
          && seen.insert(did.clone())
      });
    }

    let unlisted: Vec<(DraftId, TournamentId)> = self
      .drafts
      .values()
      .filter(|d| {
        self
          .tournaments
          .get(&d.tournament_id)
          .is_some_and(|t| !t.draft_ids.contains(&d.id))
      })
      .map(|d| (d.id.clone(), d.tournament_id.clone()))
      .collect();
    for (did, tid) in unlisted {
      if let Some(t) = self.tournaments.get_mut(&tid) {
        t.draft_ids.push(did);
      }
    }

    // A tournament never has zero drafts.
    let empty: Vec<TournamentId> = self
      .tournaments
      .values()
      .filter(|t| t.draft_ids.is_empty())
      .map(|t| t.id.clone())
      .collect();
    for tid in empty {
      self.insert_draft(Draft::new(tid, DEFAULT_DRAFT_NAME, Board::sample()));
    }

    if !self.tournaments.contains_key(&self.ui.current_tournament_id) {
      self.ui.current_tournament_id = first_tid;
    }
    let tid = &self.ui.current_tournament_id;
    let selected_ok = self
      .drafts
      .get(&self.ui.current_draft_id)
      .is_some_and(|d| d.tournament_id == *tid);
    if !selected_ok {
      self.ui.current_draft_id = self
        .tournaments
        .get(tid)
        .and_then(|t| t.draft_ids.first())
        .cloned()
        .unwrap_or_default();
    }

    for d in self.drafts.values_mut() {
      d.board.repair();
    }
  }
}
