use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".casedesk";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const STATE_DIR: &str = "state";

/// Returns the application data directory, defaulting to `~/.casedesk`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("CASEDESK_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Resolves an explicit base directory, falling back to [`app_data_dir`].
pub fn resolve_base(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(app_data_dir)
}

pub fn config_dir_in(base: &Path) -> PathBuf {
    base.join(CONFIG_DIR)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    config_dir_in(base).join(CONFIG_FILE)
}

/// Directory holding keyed client-side state (the durable signal, etc.).
pub fn state_dir_in(base: &Path) -> PathBuf {
    base.join(STATE_DIR)
}

pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
