use dirs::home_dir;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".k1_tutor";
const STORE_DIR: &str = "store";

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "K1_TUTOR_HOME";

/// Returns the application data directory, defaulting to `~/.k1_tutor`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Directory holding one JSON file per stored key.
pub fn store_dir(base: &std::path::Path) -> PathBuf {
    base.join(STORE_DIR)
}
