//! Session-bridge binary entry point.

use std::process::ExitCode;
use std::sync::Arc;

use tracing::info;

use session_bridge::api::{serve_with_state, AppState};
use session_bridge::cli;
use session_bridge::config::Config;
use session_bridge::logging;
use session_bridge::session::{MemoryStore, RandomIdGenerator, SessionStore};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("session-bridge: {}", err);
            eprintln!("Try 'session-bridge --help' for usage.");
            return ExitCode::FAILURE;
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }
    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("session-bridge: {}", err);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    logging::init_with(config.log_filter());

    info!("session-bridge v{}", env!("CARGO_PKG_VERSION"));

    let options = match config.to_session_options() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("session-bridge: {}", err);
            return ExitCode::FAILURE;
        }
    };
    let server_config = match config.to_server_config() {
        Ok(server_config) => server_config,
        Err(err) => {
            eprintln!("session-bridge: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::new());
    let state = AppState {
        store: Arc::clone(&store),
        ids: Arc::new(RandomIdGenerator::new()),
        options,
    };
    info!("Session store initialized (session name: {})", state.options.name);

    // Expired records are reclaimed out-of-band rather than on the
    // request path.
    let gc_interval = config.gc_interval();
    let gc_store = Arc::clone(&store);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(gc_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            match gc_store.cleanup_expired() {
                Ok(0) => {}
                Ok(removed) => info!("Garbage collected {} expired session(s)", removed),
                Err(err) => tracing::warn!("Garbage collection failed: {}", err),
            }
        }
    });
    info!("Garbage collection runs every {}s", gc_interval.as_secs());

    if let Err(err) = serve_with_state(server_config, state).await {
        tracing::error!("Server error: {}", err);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
