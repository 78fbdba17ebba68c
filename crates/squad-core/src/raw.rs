//! Lenient shapes for data crossing a trust boundary.
//!
//! Persisted state, legacy state, and imported boards are deserialised into
//! the `Raw*` types below, which accept anything: a field of the wrong JSON
//! type is treated as missing and non-string ids are dropped. The only way
//! from a raw shape to a strict one is [`normalize_board`], [`ensure_valid`],
//! or [`migrate_legacy`].

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

use crate::{
  board::{Board, Buckets, Titles},
  player::Player,
  root::{Draft, Root, Selection, Tournament, SCHEMA_VERSION},
  session::Snapshot,
};

/// Name given to a player record that has none.
pub const UNNAMED: &str = "Unnamed";

// ─── Lenient field decoders ──────────────────────────────────────────────────

/// Deserialise `T`, falling back to `T::default()` on a type mismatch.
fn lenient<'de, D, T>(de: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned + Default,
{
  let value = Value::deserialize(de)?;
  Ok(T::deserialize(value).unwrap_or_default())
}

fn lenient_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  match Value::deserialize(de)? {
    Value::String(s) => Ok(Some(s)),
    _ => Ok(None),
  }
}

fn lenient_ids<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
  D: Deserializer<'de>,
{
  match Value::deserialize(de)? {
    Value::Array(items) => Ok(
      items
        .into_iter()
        .filter_map(|v| match v {
          Value::String(s) => Some(s),
          _ => None,
        })
        .collect(),
    ),
    _ => Ok(Vec::new()),
  }
}

fn lenient_millis<'de, D>(de: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
  D: Deserializer<'de>,
{
  let millis = match Value::deserialize(de)? {
    Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
    _ => None,
  };
  Ok(millis.and_then(DateTime::from_timestamp_millis))
}

/// An object of entries; entries that fail to decode are skipped, as is a
/// non-object value as a whole. Key order is preserved.
fn lenient_entries<'de, D, T>(de: D) -> Result<IndexMap<String, T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  match Value::deserialize(de)? {
    Value::Object(map) => Ok(
      map
        .into_iter()
        .filter_map(|(k, v)| T::deserialize(v).ok().map(|t| (k, t)))
        .collect(),
    ),
    _ => Ok(IndexMap::new()),
  }
}

// ─── Board ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPlayer {
  #[serde(deserialize_with = "lenient_string")]
  pub name:  Option<String>,
  #[serde(deserialize_with = "lenient_string")]
  pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawBuckets {
  #[serde(deserialize_with = "lenient_ids")]
  pub yes:   Vec<String>,
  #[serde(deserialize_with = "lenient_ids")]
  pub maybe: Vec<String>,
  #[serde(deserialize_with = "lenient_ids")]
  pub no:    Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTitles {
  #[serde(deserialize_with = "lenient_string")]
  pub available: Option<String>,
  #[serde(deserialize_with = "lenient_string")]
  pub yes:       Option<String>,
  #[serde(deserialize_with = "lenient_string")]
  pub maybe:     Option<String>,
  #[serde(deserialize_with = "lenient_string")]
  pub no:        Option<String>,
}

/// A board as found in storage or in an import file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawBoard {
  #[serde(deserialize_with = "lenient_entries")]
  pub players:         IndexMap<String, RawPlayer>,
  #[serde(deserialize_with = "lenient_ids")]
  pub available_order: Vec<String>,
  #[serde(deserialize_with = "lenient")]
  pub buckets:         RawBuckets,
  #[serde(deserialize_with = "lenient")]
  pub titles:          RawTitles,
}

/// Build a structurally valid [`Board`] from `raw`.
///
/// Safe on partial or hostile input, including `{}`. The map key is the
/// authoritative player id.
pub fn normalize_board(raw: RawBoard) -> Board {
  let players = raw
    .players
    .into_iter()
    .map(|(id, p)| {
      let player = Player {
        id:    id.clone(),
        name:  p.name.unwrap_or_else(|| UNNAMED.to_owned()),
        notes: p.notes.unwrap_or_default(),
      };
      (id, player)
    })
    .collect();

  let mut board = Board {
    players,
    available_order: raw.available_order,
    buckets: Buckets {
      yes:   raw.buckets.yes,
      maybe: raw.buckets.maybe,
      no:    raw.buckets.no,
    },
    titles: Titles {
      available: raw.titles.available.unwrap_or_default(),
      yes:       raw.titles.yes.unwrap_or_default(),
      maybe:     raw.titles.maybe.unwrap_or_default(),
      no:        raw.titles.no.unwrap_or_default(),
    },
  };
  board.repair();
  board
}

// ─── Root ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawTournament {
  #[serde(deserialize_with = "lenient_string")]
  pub name:       Option<String>,
  #[serde(deserialize_with = "lenient_ids")]
  pub draft_ids:  Vec<String>,
  #[serde(deserialize_with = "lenient_millis")]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(deserialize_with = "lenient_millis")]
  pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawDraft {
  #[serde(deserialize_with = "lenient_string")]
  pub tournament_id: Option<String>,
  #[serde(deserialize_with = "lenient_string")]
  pub name:          Option<String>,
  #[serde(deserialize_with = "lenient_millis")]
  pub created_at:    Option<DateTime<Utc>>,
  #[serde(deserialize_with = "lenient_millis")]
  pub updated_at:    Option<DateTime<Utc>>,
  #[serde(flatten)]
  pub board:         RawBoard,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawSelection {
  #[serde(deserialize_with = "lenient_string")]
  pub current_tournament_id: Option<String>,
  #[serde(deserialize_with = "lenient_string")]
  pub current_draft_id:      Option<String>,
}

/// A root as found under the versioned storage key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRoot {
  #[serde(deserialize_with = "lenient_entries")]
  pub tournaments: IndexMap<String, RawTournament>,
  #[serde(deserialize_with = "lenient_entries")]
  pub drafts:      IndexMap<String, RawDraft>,
  #[serde(deserialize_with = "lenient")]
  pub ui:          RawSelection,
}

/// Build a structurally valid [`Root`] from `raw`, repairing references and
/// selection. See [`Root::ensure_valid`].
pub fn ensure_valid(raw: RawRoot) -> Root {
  let now = crate::now();

  let tournaments = raw
    .tournaments
    .into_iter()
    .map(|(id, t)| {
      let created_at = t.created_at.unwrap_or(now);
      let tournament = Tournament {
        id:         id.clone(),
        name:       t.name.unwrap_or_else(|| "Tournament".to_owned()),
        draft_ids:  t.draft_ids,
        created_at,
        updated_at: t.updated_at.unwrap_or(created_at),
      };
      (id, tournament)
    })
    .collect();

  let drafts = raw
    .drafts
    .into_iter()
    .map(|(id, d)| {
      let created_at = d.created_at.unwrap_or(now);
      let draft = Draft {
        id:            id.clone(),
        tournament_id: d.tournament_id.unwrap_or_default(),
        name:          d.name.unwrap_or_else(|| "Draft".to_owned()),
        created_at,
        updated_at:    d.updated_at.unwrap_or(created_at),
        board:         normalize_board(d.board),
      };
      (id, draft)
    })
    .collect();

  let mut root = Root {
    version: SCHEMA_VERSION,
    tournaments,
    drafts,
    ui: Selection {
      current_tournament_id: raw.ui.current_tournament_id.unwrap_or_default(),
      current_draft_id:      raw.ui.current_draft_id.unwrap_or_default(),
    },
  };
  root.repair();
  root
}

/// Wrap a legacy single-board state as the only draft of a new tournament,
/// both with fresh ids.
pub fn migrate_legacy(legacy: RawBoard) -> Root {
  Root::with_board(normalize_board(legacy))
}

// ─── Undo snapshot ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawSnapshot {
  #[serde(deserialize_with = "lenient_string")]
  pub draft_id: Option<String>,
  #[serde(deserialize_with = "lenient")]
  pub board:    RawBoard,
}

impl RawSnapshot {
  /// `None` when the snapshot does not name a draft.
  pub fn into_snapshot(self) -> Option<Snapshot> {
    Some(Snapshot {
      draft_id: self.draft_id?,
      board:    normalize_board(self.board),
    })
  }
}
