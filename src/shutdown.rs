//! Process signal handling
//!
//! Interrupt, termination and hangup signals all trigger the same graceful
//! shutdown path; the session exits with status 0 in every case.

use tokio::signal;

/// Wait for any termination signal and resolve with its name.
///
/// On Unix this listens for SIGINT, SIGTERM and SIGHUP; elsewhere only
/// Ctrl-C is available. If the extra Unix listeners cannot be registered,
/// Ctrl-C alone still works.
pub async fn wait_for_signal() -> &'static str {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal as unix_signal, SignalKind};

        let terminate = unix_signal(SignalKind::terminate());
        let hangup = unix_signal(SignalKind::hangup());

        match (terminate, hangup) {
            (Ok(mut terminate), Ok(mut hangup)) => {
                tokio::select! {
                    _ = signal::ctrl_c() => "SIGINT",
                    _ = terminate.recv() => "SIGTERM",
                    _ = hangup.recv() => "SIGHUP",
                }
            }
            _ => ctrl_c_only().await,
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c_only().await
    }
}

async fn ctrl_c_only() -> &'static str {
    let _ = signal::ctrl_c().await;
    "interrupt"
}
