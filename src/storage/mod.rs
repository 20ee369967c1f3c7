pub mod json_backend;

use crate::errors::Result;
use crate::wizard::StatusSignal;

/// Fixed key the durable status signal is stored under.
pub const WIZARD_SIGNAL_KEY: &str = "wizard_signal";

/// Abstraction over durable client-side storage for the wizard status signal.
pub trait SignalStore: Send + Sync {
    fn load(&self) -> Result<Option<StatusSignal>>;
    fn save(&self, signal: &StatusSignal) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

pub use json_backend::{JsonSignalStore, SIGNAL_SCHEMA_VERSION};
