use rfid_server::{
    LineCardReader, ReaderLoopConfig, ReaderPeripherals, ServerResult, ServerState, build_router,
    logger, run_reader_loop, run_watchdog_monitor,
};
use rfid_sse::{
    AppState, LogBuzzer, LogIndicator, Metrics, Publisher, PublisherConfig, SessionConfig,
    SessionPeripherals, ShutdownCoordinator, SoftwareWatchdog,
};

use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ServerResult<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    // Load and validate configuration
    let config = rfid_config::Config::load()?;
    config.validate()?;

    let log_file_path = config.log_file_path()?;
    if let Some(dir) = log_file_path.as_ref().and_then(|path| path.parent()) {
        std::fs::create_dir_all(dir)?;
    }

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting rfid-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let metrics = Metrics::new();
    let shutdown = ShutdownCoordinator::new();
    let publisher = Publisher::new(PublisherConfig::from(&config.broadcast), metrics.clone());
    let channel = config.broadcast.default_channel.clone();

    // Green follows the stream, red follows the reader
    let stream_indicator = Arc::new(LogIndicator::new("green"));
    let read_indicator = Arc::new(LogIndicator::new("red"));
    let buzzer = Arc::new(LogBuzzer);
    let watchdog = Arc::new(SoftwareWatchdog::new());

    let watchdog_timeout = match config.reader.watchdog_timeout_secs {
        0 => None,
        _ if !config.reader.enabled => None,
        secs => Some(Duration::from_secs(secs)),
    };

    let app_state = AppState {
        publisher: publisher.clone(),
        channel: channel.clone(),
        peripherals: SessionPeripherals {
            indicator: stream_indicator,
            buzzer: buzzer.clone(),
        },
        session_config: SessionConfig::from(&config.peripherals),
        metrics: metrics.clone(),
        shutdown: shutdown.clone(),
    };

    let app = build_router(ServerState {
        app: app_state,
        watchdog: Arc::clone(&watchdog),
        watchdog_timeout,
    });

    // Card reader
    if config.reader.enabled {
        tokio::spawn(run_reader_loop(
            LineCardReader::stdin(),
            publisher,
            channel,
            ReaderPeripherals {
                indicator: read_indicator,
                buzzer,
                watchdog: watchdog.clone(),
            },
            ReaderLoopConfig::from(&config),
            metrics,
            shutdown.subscribe_guard(),
        ));
    } else {
        warn!("Card reader DISABLED - ids arrive only through /id");
    }

    if let Some(timeout) = watchdog_timeout {
        tokio::spawn(run_watchdog_monitor(watchdog, timeout, shutdown.clone()));
    }

    // Create TCP listener
    let listener = TcpListener::bind(config.bind_addr()).await?;
    let actual_addr = listener.local_addr()?;
    info!("Server listening on {actual_addr}");

    // Spawn signal handler for graceful shutdown
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown_for_signal.shutdown();
            }
            Err(e) => {
                error!("Failed to listen for SIGINT: {e}");
            }
        }
    });

    // Start server with graceful shutdown
    info!("Server ready to accept connections");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.subscribe_guard().wait().await;
            info!("Graceful shutdown complete");
        })
        .await?;

    Ok(())
}
