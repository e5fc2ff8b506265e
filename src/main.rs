//! Odia TTS Gateway server
//!
//! ```sh
//! # Run with environment configuration (optionally ~/.config/odia-tts-gateway/config.toml)
//! SECRET_KEY=... KEY_PEPPER=... ODIA_TTS_URL=http://127.0.0.1:5051/tts odia-tts-gateway
//!
//! # Custom config path and port
//! odia-tts-gateway --config /etc/odia-tts-gateway/config.toml --port 8080
//!
//! # Validate configuration without starting
//! odia-tts-gateway --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use odia_gateway::config::AppConfig;
use odia_gateway::infrastructure::redact_url;
use odia_gateway::server::{init_tracing, ServerHandle, ServerOptions};

#[derive(Parser, Debug)]
#[command(
    name = "odia-tts-gateway",
    version,
    about = "API-key gateway in front of an Odia text-to-speech endpoint",
    long_about = "Odia TTS Gateway: issues API keys, checks them on /speak and \
                  streams audio from the configured TTS upstream.\n\n\
                  Environment variables override the optional config file \
                  (default: ~/.config/odia-tts-gateway/config.toml)."
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

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
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Err(e) = config.apply_overrides(cli.port, cli.log_level.as_deref()) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("✅ Configuration is valid");
        println!("   Listen      : {}", config.server.address());
        println!("   Key store   : {}", redact_url(&config.database.url));
        if config.upstream.url.is_empty() {
            println!("   Upstream    : (not set)");
        } else {
            println!(
                "   Upstream    : {} {}",
                config.upstream.method.as_str(),
                config.upstream.url
            );
        }
        println!("   Require key : {}", config.speak.require_key);
        println!("   Fallback    : {}", config.speak.dev_fallback_audio);
        println!("   Admin       : {}", if config.admin_enabled() { "enabled" } else { "disabled" });
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    init_tracing(&config);
    if let Some(path) = cli.config.as_ref() {
        info!("Configuration loaded from {}", path.display());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    // Wait for shutdown signal, then clean up
    handle.shutdown_signal().wait().await;
    if !handle.wait().await {
        std::process::exit(1);
    }

    Ok(())
}
