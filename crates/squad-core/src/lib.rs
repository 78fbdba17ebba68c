//! Core types and logic for the Squad roster board.
//!
//! A [`board::Board`] partitions a roster of players into an "available" pool
//! and three decision buckets. Boards live inside drafts, drafts inside
//! tournaments, and the whole tree is a single [`root::Root`] persisted
//! through a [`store::KeyValueStore`].
//!
//! Everything in this crate except persistence is pure: every mutator takes
//! its input by reference and returns a new value.

pub mod board;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod history;
pub mod memory;
pub mod organize;
pub mod player;
pub mod raw;
pub mod root;
pub mod session;
pub mod store;

pub use error::{Error, Result};

use chrono::{DateTime, SubsecRound, Utc};

/// Generate a fresh opaque id for a player, draft, or tournament.
pub fn new_id() -> String { uuid::Uuid::new_v4().to_string() }

/// The current time at millisecond precision, which is what survives a
/// save/load cycle.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(3) }
