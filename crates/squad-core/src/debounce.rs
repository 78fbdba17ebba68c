//! Debounced background persistence.
//!
//! Interactive sessions schedule a save after every change. The saver waits
//! until no new change has arrived for the configured delay and then writes
//! only the most recent root, so a burst of edits costs one write.

use std::{sync::Arc, time::Duration};

use tokio::{
  sync::{mpsc, oneshot},
  task::JoinHandle,
  time::{Instant, sleep},
};
use tracing::{debug, warn};

use crate::{
  root::Root,
  store::{KeyValueStore, RootStore},
};

/// Quiet period before a scheduled save is written.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(150);

enum Command {
  Save(Box<Root>),
  Flush(oneshot::Sender<()>),
}

/// Handle to the background save task.
///
/// Dropping the handle without calling [`DebouncedSaver::shutdown`] still
/// writes the pending root once the task notices the channel has closed.
pub struct DebouncedSaver {
  tx:   mpsc::UnboundedSender<Command>,
  task: JoinHandle<()>,
}

impl DebouncedSaver {
  pub fn spawn<S>(store: Arc<RootStore<S>>, delay: Duration) -> Self
  where
    S: KeyValueStore + 'static,
  {
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(store, rx, delay));
    Self { tx, task }
  }

  /// Replace the pending root and restart the quiet period.
  pub fn schedule(&self, root: Root) {
    if self.tx.send(Command::Save(Box::new(root))).is_err() {
      warn!("save task has stopped; change not scheduled");
    }
  }

  /// Write the pending root now, if there is one.
  pub async fn flush(&self) {
    let (ack, done) = oneshot::channel();
    if self.tx.send(Command::Flush(ack)).is_ok() {
      let _ = done.await;
    }
  }

  /// Write anything pending and stop the task.
  pub async fn shutdown(self) {
    let Self { tx, task } = self;
    drop(tx);
    if let Err(e) = task.await {
      warn!("save task ended abnormally: {e}");
    }
  }
}

async fn run<S: KeyValueStore>(
  store: Arc<RootStore<S>>,
  mut rx: mpsc::UnboundedReceiver<Command>,
  delay: Duration,
) {
  let mut pending: Option<Box<Root>> = None;
  let timer = sleep(delay);
  tokio::pin!(timer);

  loop {
    tokio::select! {
      cmd = rx.recv() => match cmd {
        Some(Command::Save(root)) => {
          pending = Some(root);
          timer.as_mut().reset(Instant::now() + delay);
        }
        Some(Command::Flush(ack)) => {
          if let Some(root) = pending.take() {
            store.save(&root).await;
          }
          let _ = ack.send(());
        }
        None => break,
      },
      () = &mut timer, if pending.is_some() => {
        if let Some(root) = pending.take() {
          debug!("writing debounced save");
          store.save(&root).await;
        }
      }
    }
  }

  if let Some(root) = pending.take() {
    store.save(&root).await;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{memory::MemoryStore, store::ROOT_KEY};

  fn saver() -> (MemoryStore, DebouncedSaver) {
    let kv = MemoryStore::new();
    let store = Arc::new(RootStore::new(kv.clone()));
    (kv, DebouncedSaver::spawn(store, DEFAULT_DELAY))
  }

  fn json(root: &Root) -> String { serde_json::to_string(root).unwrap() }

  #[tokio::test(start_paused = true)]
  async fn burst_of_changes_is_written_once() {
    let (kv, saver) = saver();
    let first = Root::new_default();
    let second = first.add_tournament(Some("Two"));
    let third = second.add_tournament(Some("Three"));

    saver.schedule(first);
    sleep(Duration::from_millis(100)).await;
    saver.schedule(second);
    sleep(Duration::from_millis(100)).await;
    saver.schedule(third.clone());
    sleep(Duration::from_millis(100)).await;
    assert_eq!(kv.writes(), 0);

    sleep(Duration::from_millis(100)).await;
    assert_eq!(kv.writes(), 1);
    assert_eq!(kv.peek(ROOT_KEY), Some(json(&third)));

    saver.shutdown().await;
    assert_eq!(kv.writes(), 1);
  }

  #[tokio::test(start_paused = true)]
  async fn shutdown_writes_pending_root() {
    let (kv, saver) = saver();
    let root = Root::new_default();
    saver.schedule(root.clone());
    saver.shutdown().await;
    assert_eq!(kv.writes(), 1);
    assert_eq!(kv.peek(ROOT_KEY), Some(json(&root)));
  }

  #[tokio::test(start_paused = true)]
  async fn flush_writes_without_waiting() {
    let (kv, saver) = saver();
    saver.flush().await;
    assert_eq!(kv.writes(), 0);

    saver.schedule(Root::new_default());
    saver.flush().await;
    assert_eq!(kv.writes(), 1);

    // Nothing left for the timer.
    sleep(Duration::from_secs(1)).await;
    assert_eq!(kv.writes(), 1);
    saver.shutdown().await;
  }

  #[tokio::test(start_paused = true)]
  async fn failed_write_is_not_retried_or_fatal() {
    let (kv, saver) = saver();
    kv.set_fail_writes(true);
    saver.schedule(Root::new_default());
    sleep(Duration::from_secs(1)).await;
    assert_eq!(kv.peek(ROOT_KEY), None);

    kv.set_fail_writes(false);
    let root = Root::new_default();
    saver.schedule(root.clone());
    saver.shutdown().await;
    assert_eq!(kv.peek(ROOT_KEY), Some(json(&root)));
  }
}
