use std::sync::Arc;
use tokio::sync::Notify;

mod config;
mod handler;
mod http;
mod logger;
mod server;
mod templates;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;

    logger::init(&cfg)?;

    // Build the Tokio runtime, sizing the thread pool from config
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let state = Arc::new(config::AppState::new(&cfg));
    let shutdown = Arc::new(Notify::new());

    logger::log_server_start(&addr, &cfg);

    server::signal::start_signal_handler(Arc::clone(&state), Arc::clone(&shutdown));

    // spawn_local is used for per-connection tasks
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::run_accept_loop(listener, state, shutdown))
        .await
}
