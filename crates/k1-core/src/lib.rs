//! k1-core
//!
//! Business logic for the K-1 tutor: the running ledger calculator, worksheet
//! editing and snapshots, quiz and game sessions, and progress tracking.
//! Depends on k1-domain. No CLI, no terminal I/O; persistence goes through the
//! [`storage::KeyValueStore`] trait.

pub mod calculator;
pub mod error;
pub mod game_session;
pub mod progress_service;
pub mod quiz_session;
pub mod snapshot_service;
pub mod storage;
pub mod time;
pub mod worksheet_service;

pub use calculator::*;
pub use error::CoreError;
pub use game_session::*;
pub use progress_service::*;
pub use quiz_session::*;
pub use snapshot_service::*;
pub use storage::{KeyValueStore, MemoryStore};
pub use time::{Clock, FixedClock, SystemClock};
pub use worksheet_service::*;
