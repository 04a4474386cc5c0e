//! Log output for hosts that have no subscriber of their own.
//!
//! The renderer only emits `tracing` events. Hosts that already install a
//! subscriber need nothing from this module.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, prelude::*, util::SubscriberInitExt};

/// Environment variable read by [`init`].
pub const LOG_ENV: &str = "POUR_LOG";

const DEFAULT_FILTER: &str = "info";

static INSTALLED: Once = Once::new();

/// Installs a formatting subscriber filtered by `POUR_LOG` (default `info`).
///
/// Idempotent. Does nothing if another global subscriber is already set.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter);
}

/// Installs a formatting subscriber with an explicit filter directive such as
/// `"pour=debug"`. Falls back to `info` if `directives` does not parse.
///
/// Idempotent: only the first call of [`init`] or `init_with_filter` takes effect.
pub fn init_with_filter(directives: &str) {
    let filter =
        EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter);
}

fn install(filter: EnvFilter) {
    INSTALLED.call_once(|| {
        let console = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_filter(filter);

        // Another global subscriber may already be set.
        let _ = tracing_subscriber::registry().with(console).try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_with_filter("pour=trace");
        init_with_filter("not a [valid filter");
        init();
        tracing::info!("logging installed");
    }
}
