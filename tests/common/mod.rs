#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use assert_cmd::Command;
use k1_tutor::config::ConfigManager;
use k1_tutor::core::MemoryStore;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a fresh data home that is removed when the test binary exits.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// In-memory store plus a config manager rooted in its own temp directory.
pub fn setup_test_env() -> (Arc<MemoryStore>, ConfigManager) {
    let base = temp_home();
    let config_manager =
        ConfigManager::with_base_dir(base).expect("create config manager for temp dir");
    (Arc::new(MemoryStore::new()), config_manager)
}

/// The CLI binary in script mode, reading and writing under `home`.
pub fn script_command(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("k1_tutor_cli").expect("binary built");
    cmd.env("K1_TUTOR_CLI_SCRIPT", "1")
        .env("K1_TUTOR_HOME", home)
        .env("NO_COLOR", "1");
    cmd
}
