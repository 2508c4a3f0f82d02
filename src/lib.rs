#![doc(test(attr(deny(warnings))))]

//! K-1 Tutor teaches partnership taxation through reference material, quizzes,
//! a scenario game and a running basis worksheet, driven from a shell.

pub mod cli;
pub mod utils;

pub use k1_config as config;
pub use k1_content as content;
pub use k1_core as core;
pub use k1_domain as domain;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("K-1 Tutor tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
