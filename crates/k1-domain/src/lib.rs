//! k1-domain
//!
//! Pure domain models (basis worksheet, quizzes, game levels, reference content).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod common;
pub mod game;
pub mod quiz;
pub mod reference;
pub mod worksheet;

pub use common::*;
pub use game::*;
pub use quiz::*;
pub use reference::*;
pub use worksheet::*;
