#![cfg(test)]

//! Tracing subscriber for the crate's own unit tests.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install the test subscriber once per binary. `TEST_LOG` wins over
/// `RUST_LOG`; with neither set only warnings show.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        fmt()
            .with_env_filter(test_filter())
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

fn test_filter() -> EnvFilter {
    std::env::var("TEST_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
        assert!(INITIALIZED.get().is_some());
        tracing::warn!(game_id = 0, "logging installed");
    }
}
