use serde::{Deserialize, Serialize};

/// Shared status record gating the wizard's navigation controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSignal {
    pub is_loading: bool,
    pub error: Option<String>,
    pub is_valid: bool,
}

impl Default for StatusSignal {
    fn default() -> Self {
        Self {
            is_loading: false,
            error: None,
            is_valid: true,
        }
    }
}

impl StatusSignal {
    /// Back and forward controls are both disabled while this holds.
    pub fn controls_disabled(&self) -> bool {
        self.is_loading || !self.is_valid
    }

    pub(crate) fn start_loading(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub(crate) fn finish_ok(&mut self) {
        self.is_loading = false;
        self.error = None;
    }

    pub(crate) fn finish_err(&mut self, message: impl Into<String>) {
        self.is_loading = false;
        self.error = Some(message.into());
    }

    pub(crate) fn set_valid(&mut self, valid: bool) {
        self.is_valid = valid;
    }

    /// A persisted signal never comes back busy: nothing is in flight after
    /// a restart.
    pub(crate) fn restored(mut self) -> Self {
        self.is_loading = false;
        self
    }
}
