pub mod build_info;
pub mod paths;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "casedesk_core=info".parse() {
            filter = filter.add_directive(directive);
        }

        // A subscriber installed by the host (or another test) wins.
        let _ = fmt().with_env_filter(filter).try_init();
    });
}
