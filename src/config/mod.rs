use serde::{Deserialize, Serialize};
use std::{
    env,
    fmt,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use crate::{
    errors::{CaseDeskError, Result},
    utils::paths::{self, ensure_dir},
};

const TMP_SUFFIX: &str = "tmp";
const API_URL_ENV: &str = "CASEDESK_API_URL";
const PERSISTENCE_ENV: &str = "CASEDESK_SIGNAL_PERSISTENCE";

/// Where the wizard's validity/loading signal lives between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalPersistence {
    /// Kept in memory for the lifetime of the session only.
    #[default]
    Volatile,
    /// Written to the application state directory after every change.
    Durable,
}

impl fmt::Display for SignalPersistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalPersistence::Volatile => write!(f, "volatile"),
            SignalPersistence::Durable => write!(f, "durable"),
        }
    }
}

impl FromStr for SignalPersistence {
    type Err = CaseDeskError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "volatile" => Ok(SignalPersistence::Volatile),
            "durable" => Ok(SignalPersistence::Durable),
            other => Err(CaseDeskError::Config(format!(
                "unknown signal persistence `{other}` (expected volatile or durable)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub home_route: String,
    pub signal_persistence: SignalPersistence,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".into(),
            request_timeout_secs: 30,
            home_route: "/".into(),
            signal_persistence: SignalPersistence::Volatile,
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Applies `CASEDESK_API_URL` and `CASEDESK_SIGNAL_PERSISTENCE` on top of
    /// the file values. An unparseable persistence value is ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var(API_URL_ENV) {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                self.api_base_url = trimmed.to_string();
            }
        }
        if let Ok(raw) = env::var(PERSISTENCE_ENV) {
            match raw.parse::<SignalPersistence>() {
                Ok(policy) => self.signal_persistence = policy,
                Err(err) => tracing::warn!(error = %err, "ignoring {}", PERSISTENCE_ENV),
            }
        }
        self
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::from_base(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        ensure_dir(&paths::config_dir_in(&base))?;
        Ok(Self {
            path: paths::config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config: Config = serde_json::from_str(&data)?;
            tracing::debug!(path = %self.path.display(), "loaded configuration");
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Loads the configuration, writing the defaults on first run so there
    /// is a file to edit.
    pub fn load_or_init(&self) -> Result<Config> {
        if self.path.exists() {
            return self.load();
        }
        let config = Config::default();
        self.save(&config)?;
        tracing::info!(path = %self.path.display(), "wrote default configuration");
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
