//! Single-level undo.

/// Holds at most one snapshot. Recording replaces whatever was there; taking
/// empties the slot, so a second undo in a row finds nothing.
#[derive(Debug, Clone)]
pub struct UndoSlot<T> {
  last: Option<T>,
}

impl<T> Default for UndoSlot<T> {
  fn default() -> Self { Self { last: None } }
}

impl<T> UndoSlot<T> {
  pub fn new() -> Self { Self::default() }

  pub fn with(snapshot: Option<T>) -> Self { Self { last: snapshot } }

  pub fn record(&mut self, snapshot: T) { self.last = Some(snapshot); }

  pub fn take(&mut self) -> Option<T> { self.last.take() }

  pub fn peek(&self) -> Option<&T> { self.last.as_ref() }

  pub fn is_empty(&self) -> bool { self.last.is_none() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_the_latest_snapshot_is_kept() {
    let mut slot = UndoSlot::new();
    slot.record(1);
    slot.record(2);
    assert_eq!(slot.take(), Some(2));
    assert_eq!(slot.take(), None);
    assert!(slot.is_empty());
  }
}
