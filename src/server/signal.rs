// Signal handling module
//
// Supported signals:
// - SIGHUP:  Flush the template cache (pick up edited templates)
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::Arc;
use tokio::sync::Notify;

use crate::config::AppState;
use crate::logger;

/// Start signal handlers (Unix)
///
/// Spawns a background task that listens for Unix signals. SIGHUP flushes
/// the in-memory template cache, the only runtime-mutable state this
/// server has; SIGTERM/SIGINT notify the accept loop to stop.
#[cfg(unix)]
pub fn start_signal_handler(state: Arc<AppState>, shutdown: Arc<Notify>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sighup = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(e) => {
                logger::log_error(&format!("Failed to register SIGHUP handler: {e}"));
                return;
            }
        };
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                logger::log_error(&format!("Failed to register SIGTERM handler: {e}"));
                return;
            }
        };
        let mut sigint = match signal(SignalKind::interrupt()) {
            Ok(s) => s,
            Err(e) => {
                logger::log_error(&format!("Failed to register SIGINT handler: {e}"));
                return;
            }
        };

        loop {
            tokio::select! {
                // SIGHUP: flush cached templates so edits are picked up
                _ = sighup.recv() => {
                    state.templates.flush().await;
                    logger::log_templates_flushed();
                }

                // SIGTERM: graceful shutdown. notify_one stores a permit,
                // so the accept loop sees the signal even if it is inside
                // the accept branch when the signal lands.
                _ = sigterm.recv() => {
                    shutdown.notify_one();
                    break;
                }

                // SIGINT: graceful shutdown (Ctrl+C)
                _ = sigint.recv() => {
                    shutdown.notify_one();
                    break;
                }
            }
        }
    });
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(_state: Arc<AppState>, shutdown: Arc<Notify>) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            shutdown.notify_one();
        }
    });
}
