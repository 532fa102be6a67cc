// crates/streamsentry-relay/src/logging.rs
//
// Installs the process-wide tracing subscriber once. Each session's log
// lines are tagged with its session id via the span entered in
// `Session::bind`/`Session::unbind`, not by formatting it into every
// message by hand.

use tracing_subscriber::EnvFilter;

/// Installs a global subscriber reading `RUST_LOG`, defaulting to `info`.
/// Idempotent per process — a second call is a harmless no-op if a
/// subscriber is already installed (e.g. from a test harness).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
