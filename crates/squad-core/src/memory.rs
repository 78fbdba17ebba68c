//! In-memory [`KeyValueStore`], for tests and ephemeral sessions.

use std::{
  collections::HashMap,
  sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicBool, AtomicUsize, Ordering},
  },
};

use thiserror::Error;

use crate::store::KeyValueStore;

#[derive(Debug, Error)]
#[error("write rejected by store")]
pub struct WriteRejected;

#[derive(Debug, Default)]
struct Inner {
  entries:     Mutex<HashMap<String, String>>,
  writes:      AtomicUsize,
  fail_writes: AtomicBool,
}

/// A cloneable handle to a shared map. Clones see the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Inner>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Number of successful `set` calls so far.
  pub fn writes(&self) -> usize { self.inner.writes.load(Ordering::SeqCst) }

  /// Make every subsequent `set` fail with [`WriteRejected`].
  pub fn set_fail_writes(&self, fail: bool) {
    self.inner.fail_writes.store(fail, Ordering::SeqCst);
  }

  /// Synchronous read, for assertions.
  pub fn peek(&self, key: &str) -> Option<String> {
    self.entries().get(key).cloned()
  }

  /// Synchronous write that bypasses the write counter, for seeding.
  pub fn seed(&self, key: &str, value: impl Into<String>) {
    self.entries().insert(key.to_owned(), value.into());
  }

  fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
    self.inner.entries.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl KeyValueStore for MemoryStore {
  type Error = WriteRejected;

  async fn get(&self, key: &str) -> Result<Option<String>, WriteRejected> {
    Ok(self.peek(key))
  }

  async fn set(&self, key: &str, value: String) -> Result<(), WriteRejected> {
    if self.inner.fail_writes.load(Ordering::SeqCst) {
      return Err(WriteRejected);
    }
    self.entries().insert(key.to_owned(), value);
    self.inner.writes.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }

  async fn remove(&self, key: &str) -> Result<(), WriteRejected> {
    self.entries().remove(key);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn clones_share_entries() {
    let a = MemoryStore::new();
    let b = a.clone();
    a.set("k", "v".into()).await.unwrap();
    assert_eq!(b.get("k").await.unwrap().as_deref(), Some("v"));
    assert_eq!(b.writes(), 1);

    b.remove("k").await.unwrap();
    assert_eq!(a.peek("k"), None);
  }

  #[tokio::test]
  async fn failing_writes_leave_entries_alone() {
    let store = MemoryStore::new();
    store.seed("k", "old");
    store.set_fail_writes(true);
    assert!(store.set("k", "new".into()).await.is_err());
    assert_eq!(store.peek("k").as_deref(), Some("old"));
    assert_eq!(store.writes(), 0);
  }
}
