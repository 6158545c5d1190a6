//! Startup reachability probe

use lapdelta_core::Mode;
use lapdelta_sources::RemoteSource;
use tracing::info;

/// Decide the session mode with one bounded health probe.
///
/// Runs exactly once per session, before any data load; the result is stored
/// on the session and never re-probed. Probe failures force fallback mode
/// and are logged, never surfaced to the user. Under stable network
/// conditions a second probe would answer the same.
pub async fn resolve(remote: &RemoteSource) -> Mode {
    if remote.probe().await {
        info!("live F1 API reachable, using real data");
        Mode::Remote
    } else {
        info!("live F1 API not reachable, using bundled sample data");
        Mode::Fallback
    }
}
