// Server module entry point
// Provides listener creation, connection handling, and the accept loop

pub mod connection;
pub mod listener;
pub mod signal;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use crate::config::AppState;
use crate::logger;

pub use listener::create_reusable_listener;

/// How long to wait for in-flight connections after the listener stops
const DRAIN_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Accept loop: serve connections until a shutdown signal arrives, then
/// drain in-flight connections.
pub async fn run_accept_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                logger::log_shutdown();
                break;
            }
        }
    }

    drain_connections(&active_connections).await;
    Ok(())
}

/// Wait for active connections to finish, bounded by `DRAIN_TIMEOUT`
async fn drain_connections(active_connections: &Arc<AtomicUsize>) {
    let deadline = tokio::time::Instant::now() + DRAIN_TIMEOUT;
    while active_connections.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Drain timeout reached with {} connections still active",
                active_connections.load(Ordering::SeqCst)
            ));
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_state() -> Arc<AppState> {
        let mut cfg = Config::load_from("definitely-missing-config").unwrap();
        cfg.logging.access_log = false;
        Arc::new(AppState::new(&cfg))
    }

    #[tokio::test]
    async fn test_shutdown_sent_while_loop_is_busy_is_not_lost() {
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let shutdown = Arc::new(Notify::new());

        // Deliver the shutdown before the loop ever waits on it. The
        // stored permit must stop the loop on its first iteration.
        shutdown.notify_one();

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(2),
            run_accept_loop(listener, test_state(), shutdown),
        )
        .await;
        assert!(result.is_ok(), "accept loop did not stop on shutdown");
    }
}
