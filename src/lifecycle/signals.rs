//! OS signal handling.
//!
//! Translates SIGTERM/SIGINT into the graceful-shutdown path. Config reload
//! on SIGHUP is not supported; the gateway restarts to pick up changes.

/// Resolves when the process receives an interrupt or terminate signal.
pub async fn interrupted() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut term = match signal(SignalKind::terminate()) {
            Ok(term) => term,
            Err(error) => {
                tracing::error!(%error, "Failed to install SIGTERM handler");
                // Fall back to ctrl-c only.
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = term.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
