//! Subscriber installation.
//!
//! `RUST_LOG` wins when set; otherwise the supplied directives apply.

use tracing_subscriber::EnvFilter;

/// Lifecycle events at `info`; rejected tokens stay hidden at `debug`.
pub const DEFAULT_DIRECTIVES: &str = "info";

/// Install a JSON subscriber filtered by `RUST_LOG` or `fallback`.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init(fallback: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_a_no_op() {
        let _ = init("debug");
        assert!(!init(DEFAULT_DIRECTIVES));
    }
}
