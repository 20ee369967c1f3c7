use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    config::{tmp_path, write_atomic},
    errors::{CaseDeskError, Result},
    utils::paths::{self, ensure_dir},
    wizard::StatusSignal,
};

use super::{SignalStore, WIZARD_SIGNAL_KEY};

pub const SIGNAL_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoredSignal {
    schema_version: u32,
    saved_at: DateTime<Utc>,
    signal: StatusSignal,
}

/// Keeps the status signal as a JSON document under the state directory.
#[derive(Debug, Clone)]
pub struct JsonSignalStore {
    path: PathBuf,
}

impl JsonSignalStore {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = paths::resolve_base(root);
        let state_dir = paths::state_dir_in(&base);
        ensure_dir(&state_dir)?;
        Ok(Self {
            path: state_dir.join(format!("{}.json", WIZARD_SIGNAL_KEY)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SignalStore for JsonSignalStore {
    fn load(&self) -> Result<Option<StatusSignal>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)?;
        let stored: StoredSignal = serde_json::from_str(&data)?;
        if stored.schema_version > SIGNAL_SCHEMA_VERSION {
            return Err(CaseDeskError::Storage(format!(
                "`{}` was written by a newer schema version ({})",
                self.path.display(),
                stored.schema_version
            )));
        }
        tracing::debug!(path = %self.path.display(), saved_at = %stored.saved_at, "loaded stored signal");
        Ok(Some(stored.signal))
    }

    fn save(&self, signal: &StatusSignal) -> Result<()> {
        let stored = StoredSignal {
            schema_version: SIGNAL_SCHEMA_VERSION,
            saved_at: Utc::now(),
            signal: signal.clone(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
