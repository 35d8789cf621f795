//! Festival booking service, CLI server
//!
//! ```sh
//! # Run with default config (~/.config/festival-service/config.toml)
//! festival-service
//!
//! # Custom config path
//! festival-service --config /etc/festival-service/config.toml
//!
//! # Validate config without starting
//! festival-service --check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use festival_api::config::AppConfig;
use festival_api::server::{init_tracing, ServerHandle, ServerOptions};

/// Festival booking service: concerts, reservations and reports over REST.
#[derive(Parser, Debug)]
#[command(
    name = "festival-service",
    version,
    about = "Festival concert booking REST API",
    long_about = "Festival booking service: concert schedule, seat reservations \
                  with capacity guarantees, and festival reports.\n\n\
                  Default config: ~/.config/festival-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "FESTIVAL_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(festival_api::default_config_path);

    let loaded = AppConfig::load(&config_path);
    let mut config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => AppConfig::default(),
    };

    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    init_tracing(&config);

    if let Err(e) = loaded {
        error!(path = %config_path.display(), error = %e, "Failed to load configuration");
        if cli.check {
            return ExitCode::FAILURE;
        }
        error!("Using default configuration");
    } else {
        info!(path = %config_path.display(), "Configuration loaded");
    }

    if cli.check {
        return match config.validate() {
            Ok(()) => {
                println!("Configuration is valid");
                println!("   Config file : {}", config_path.display());
                println!("   API address : {}", config.api_address());
                println!("   Database    : {}", config.database.url);
                println!("   Lock timeout: {} ms", config.booking.lock_timeout_ms);
                println!("   Log level   : {}", config.logging.level);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_organizer: true,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!(error = %e, "Failed to start");
            return ExitCode::FAILURE;
        }
    };

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully");

    handle.shutdown_signal().wait().await;
    handle.wait().await;
    ExitCode::SUCCESS
}
