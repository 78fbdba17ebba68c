//! Runtime settings: an optional TOML file layered under `SQUAD_*`
//! environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use serde::Deserialize;
use squad_core::debounce::DEFAULT_DELAY;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// SQLite file holding all saved state. A leading `~/` is expanded.
  pub store_path:  PathBuf,
  /// Quiet period before the shell writes pending changes.
  pub debounce_ms: u64,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      store_path:  PathBuf::from("~/.squad/squad.db"),
      debounce_ms: DEFAULT_DELAY.as_millis() as u64,
    }
  }
}

impl Settings {
  /// Read `path` if it exists, then apply `SQUAD_*` environment overrides.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("SQUAD"))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  pub fn debounce(&self) -> Duration { Duration::from_millis(self.debounce_ms) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_gives_defaults() {
    let settings = Settings::load(Path::new("/definitely/not/here/squad.toml")).unwrap();
    assert_eq!(settings.debounce(), DEFAULT_DELAY);
    assert_eq!(settings.store_path, PathBuf::from("~/.squad/squad.db"));
  }

  #[test]
  fn file_values_override_defaults() {
    let dir = std::env::temp_dir().join(format!("squad-settings-{}", squad_core::new_id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("squad.toml");
    std::fs::write(&path, "store_path = \"/tmp/board.db\"\ndebounce_ms = 40\n").unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.store_path, PathBuf::from("/tmp/board.db"));
    assert_eq!(settings.debounce_ms, 40);
    let _ = std::fs::remove_dir_all(&dir);
  }

  #[test]
  fn tilde_expands_only_at_the_start() {
    let plain = Path::new("/var/squad.db");
    assert_eq!(expand_tilde(plain), plain);
    assert_eq!(expand_tilde(Path::new("a/~/b")), Path::new("a/~/b"));
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expand_tilde(Path::new("~/x.db")), PathBuf::from(home).join("x.db"));
    }
  }
}
