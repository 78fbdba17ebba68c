//! Integration tests for `SqliteStore` against in-memory and on-disk
//! databases.

use squad_core::{
  root::Root,
  session::Session,
  store::{KeyValueStore, ROOT_KEY, RootStore, Theme, UNDO_KEY},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Key-value operations ────────────────────────────────────────────────────

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert_eq!(s.get("nope").await.unwrap(), None);
}

#[tokio::test]
async fn set_then_overwrite() {
  let s = store().await;
  s.set("k", "one".into()).await.unwrap();
  s.set("k", "two".into()).await.unwrap();
  assert_eq!(s.get("k").await.unwrap().as_deref(), Some("two"));
  assert_eq!(s.keys().await.unwrap(), vec!["k".to_string()]);
}

#[tokio::test]
async fn remove_is_idempotent() {
  let s = store().await;
  s.set("k", "v".into()).await.unwrap();
  s.remove("k").await.unwrap();
  s.remove("k").await.unwrap();
  assert_eq!(s.get("k").await.unwrap(), None);
}

#[tokio::test]
async fn clones_share_the_connection() {
  let a = store().await;
  let b = a.clone();
  a.set("k", "v".into()).await.unwrap();
  assert_eq!(b.get("k").await.unwrap().as_deref(), Some("v"));
}

// ─── Through RootStore ───────────────────────────────────────────────────────

#[tokio::test]
async fn root_round_trips_through_sqlite() {
  let roots = RootStore::new(store().await);
  let root = roots.load().await;
  assert!(roots.backend().get(ROOT_KEY).await.unwrap().is_some());

  let tid = root.ui.current_tournament_id.clone();
  let root = root.add_draft(&tid, Some("Second")).rename_tournament(&tid, "Cup");
  roots.try_save(&root).await.unwrap();
  assert_eq!(roots.try_load().await.unwrap(), root);
}

#[tokio::test]
async fn theme_and_snapshot_persist() {
  let roots = RootStore::new(store().await);
  roots.save_theme(Theme::Light).await;
  assert_eq!(roots.load_theme().await, Theme::Light);

  let mut session = Session::new(Root::new_default());
  session.edit_board(|b| b.add_player("Zoe", "wing"));
  roots.save_snapshot(session.snapshot()).await;
  assert_eq!(roots.load_snapshot().await.as_ref(), session.snapshot());

  roots.save_snapshot(None).await;
  assert_eq!(roots.backend().get(UNDO_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn reopening_a_file_keeps_state() {
  let dir = std::env::temp_dir().join(format!("squad-test-{}", squad_core::new_id()));
  let path = dir.join("nested").join("squad.db");

  let first = RootStore::new(SqliteStore::open(&path).await.unwrap());
  let root = first.load().await.add_tournament(Some("Kept"));
  first.try_save(&root).await.unwrap();
  drop(first);

  let second = RootStore::new(SqliteStore::open(&path).await.unwrap());
  assert_eq!(second.try_load().await.unwrap(), root);

  let _ = std::fs::remove_dir_all(&dir);
}
