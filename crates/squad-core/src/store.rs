//! Persistence: the `KeyValueStore` trait and the [`RootStore`] that reads and
//! writes the application state through it.
//!
//! The trait is implemented by storage backends (e.g. `squad-store-sqlite`,
//! or [`crate::memory::MemoryStore`] in tests). Everything above it deals in
//! whole JSON documents under a handful of fixed keys.

use std::future::Future;

use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::{
  Error, Result,
  raw::{self, RawBoard, RawRoot, RawSnapshot},
  root::Root,
  session::Snapshot,
};

/// Versioned root document.
pub const ROOT_KEY: &str = "squad_root_v2";
/// Pre-tournament single board, read once and migrated.
pub const LEGACY_KEY: &str = "squad_draft_v1";
/// `"1"` for dark, `"0"` for light.
pub const THEME_KEY: &str = "squad_dark";
/// The pending undo snapshot, if any.
pub const UNDO_KEY: &str = "squad_undo_v2";

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A durable string-to-string map.
///
/// All methods return `Send` futures so stores can be shared with background
/// tasks such as [`crate::debounce::DebouncedSaver`].
pub trait KeyValueStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn get(
    &self,
    key: &str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

  /// Insert or overwrite `key`.
  fn set(
    &self,
    key: &str,
    value: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  /// Delete `key`. Removing a missing key is not an error.
  fn remove(&self, key: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

// ─── Theme ───────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
  #[default]
  Dark,
  Light,
}

impl Theme {
  fn from_flag(flag: &str) -> Self {
    if flag == "0" { Self::Light } else { Self::Dark }
  }

  fn as_flag(self) -> &'static str {
    match self {
      Self::Dark => "1",
      Self::Light => "0",
    }
  }

  pub fn toggled(self) -> Self {
    match self {
      Self::Dark => Self::Light,
      Self::Light => Self::Dark,
    }
  }
}

// ─── RootStore ───────────────────────────────────────────────────────────────

/// Loads and saves the application state through a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct RootStore<S> {
  kv: S,
}

impl<S: KeyValueStore> RootStore<S> {
  pub fn new(kv: S) -> Self { Self { kv } }

  pub fn backend(&self) -> &S { &self.kv }

  /// Load the root, never failing: any read or parse error yields the default
  /// root, which is then written back.
  pub async fn load(&self) -> Root {
    match self.try_load().await {
      Ok(root) => root,
      Err(e) => {
        warn!("could not load saved state, starting fresh: {e}");
        let root = Root::new_default();
        self.save(&root).await;
        root
      }
    }
  }

  /// Load the root from the versioned key, migrating from the legacy key
  /// when only that one is present. A first run writes the default root.
  pub async fn try_load(&self) -> Result<Root> {
    if let Some(json) = self.kv.get(ROOT_KEY).await.map_err(Error::storage)? {
      let raw: RawRoot = serde_json::from_str(&json)?;
      return Ok(raw::ensure_valid(raw));
    }

    let root = match self.kv.get(LEGACY_KEY).await.map_err(Error::storage)? {
      Some(json) => {
        // A stored `null` migrates as an empty board.
        let legacy: Option<RawBoard> = serde_json::from_str(&json)?;
        info!("migrating legacy single-board state");
        raw::migrate_legacy(legacy.unwrap_or_default())
      }
      None => {
        debug!("no saved state, using default root");
        Root::new_default()
      }
    };
    self.save(&root).await;
    Ok(root)
  }

  /// Write the root, logging instead of propagating a failure. The in-memory
  /// state stays authoritative either way.
  pub async fn save(&self, root: &Root) {
    if let Err(e) = self.try_save(root).await {
      error!("failed to save state: {e}");
    }
  }

  pub async fn try_save(&self, root: &Root) -> Result<()> {
    let json = serde_json::to_string(root)?;
    self.kv.set(ROOT_KEY, json).await.map_err(Error::storage)
  }

  // ── Theme ─────────────────────────────────────────────────────────────

  /// Dark unless `"0"` was stored. Read errors are logged and ignored.
  pub async fn load_theme(&self) -> Theme {
    match self.kv.get(THEME_KEY).await {
      Ok(flag) => flag.as_deref().map(Theme::from_flag).unwrap_or_default(),
      Err(e) => {
        warn!("could not read theme: {e}");
        Theme::default()
      }
    }
  }

  pub async fn save_theme(&self, theme: Theme) {
    if let Err(e) = self.kv.set(THEME_KEY, theme.as_flag().to_owned()).await {
      error!("failed to save theme: {e}");
    }
  }

  // ── Undo snapshot ─────────────────────────────────────────────────────

  /// The persisted undo snapshot. Unreadable snapshots are dropped.
  pub async fn load_snapshot(&self) -> Option<Snapshot> {
    let raw: RawSnapshot = self.read_lenient(UNDO_KEY).await?;
    raw.into_snapshot()
  }

  /// Persist `snapshot`, or clear the key when there is none.
  pub async fn save_snapshot(&self, snapshot: Option<&Snapshot>) {
    let result = match snapshot {
      Some(s) => match serde_json::to_string(s) {
        Ok(json) => self.kv.set(UNDO_KEY, json).await.map_err(Error::storage),
        Err(e) => Err(e.into()),
      },
      None => self.kv.remove(UNDO_KEY).await.map_err(Error::storage),
    };
    if let Err(e) = result {
      error!("failed to save undo snapshot: {e}");
    }
  }

  async fn read_lenient<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
    let json = match self.kv.get(key).await {
      Ok(json) => json?,
      Err(e) => {
        warn!(key, "read failed: {e}");
        return None;
      }
    };
    serde_json::from_str(&json)
      .inspect_err(|e| warn!(key, "discarding unreadable value: {e}"))
      .ok()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn theme_flags() {
    assert_eq!(Theme::from_flag("0"), Theme::Light);
    assert_eq!(Theme::from_flag("1"), Theme::Dark);
    assert_eq!(Theme::from_flag("garbage"), Theme::Dark);
    assert_eq!(Theme::Light.as_flag(), "0");
    assert_eq!(Theme::Dark.toggled(), Theme::Light);
    assert_eq!("LIGHT".parse::<Theme>().unwrap(), Theme::Light);
    assert_eq!(Theme::Dark.to_string(), "dark");
  }
}
