//! Parking gate CLI server
//!
//! Headless gate server suitable for a systemd unit, a container, or a
//! kiosk box next to the barrier.
//!
//! ```sh
//! # Run with default config (~/.config/parking-gate/config.toml)
//! parking-gate-cli
//!
//! # Custom config path
//! parking-gate-cli --config /etc/parking-gate/config.toml
//!
//! # Override the port and log level
//! parking-gate-cli --api-port 8081 --log-level debug
//!
//! # Validate config without starting
//! parking-gate-cli --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use parking_gate::config::AppConfig;
use parking_gate::server::{init_tracing, ServerHandle, ServerOptions};

/// Parking gate: session lifecycle and billing server.
#[derive(Parser, Debug)]
#[command(
    name = "parking-gate-cli",
    version,
    about = "Parking session lifecycle and billing server",
    long_about = "REST API server recording vehicle entries and exits, pricing stays \
                  by weekday tariff and debiting owner accounts.\n\n\
                  Default config: ~/.config/parking-gate/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "PARKING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(parking_gate::default_config_path);

    let loaded = AppConfig::load(&config_path);
    let mut config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => AppConfig::default(),
    };
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);

    match loaded {
        Ok(_) => info!("Configuration loaded from {}", config_path.display()),
        Err(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            if cli.check {
                return Err(e.into());
            }
            error!("Using default configuration.");
        }
    }

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.api_port {
        info!("CLI override: api_port = {}", port);
        config.server.api_port = port;
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        let policy = config.billing.resolver_policy()?;
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.server.address());
        println!("   Database    : {}", config.database.url);
        println!("   Log level   : {}", config.logging.level);
        println!("   Currency    : {}", config.billing.currency);
        println!("   Neg. balance: {}", config.billing.allow_negative_balance);
        println!("   Tariffs     : {:?} / {:?} (UTC{})", policy.matching, policy.tie_break, policy.utc_offset);
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
