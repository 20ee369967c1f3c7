#![doc(test(attr(deny(warnings))))]

//! CaseDesk Core implements the multi-step case-creation wizard of the
//! CaseDesk orthodontic case manager: step registry, form state, stepper,
//! validity signal, footer navigation and the REST calls that create a case.

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod storage;
pub mod utils;
pub mod wizard;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("CaseDesk tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
