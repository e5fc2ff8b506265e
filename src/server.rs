//! Gateway server runtime.
//!
//! [`ServerHandle`] owns the full lifecycle: metrics recorder, key store
//! (with migrations), upstream client, REST API and graceful shutdown.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::application::{KeyManager, SpeakForwarder};
use crate::config::AppConfig;
use crate::infrastructure::{open_key_store, redact_url, DatabaseConfig};
use crate::interfaces::{create_api_router, GatewayState};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

// ── Options ────────────────────────────────────────────────────────

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running gateway.
pub struct ServerHandle {
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the REST API is bound to.
    pub local_addr: SocketAddr,

    db: Option<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

/// The global metrics recorder can only be installed once per process, so a
/// restart within the same process reuses the first handle.
fn prometheus_handle() -> PrometheusHandle {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("📊 Prometheus metrics recorder installed");
                handle
            }
            Err(e) => {
                warn!("Prometheus recorder not installed, /metrics will stay empty: {}", e);
                PrometheusBuilder::new().build_recorder().handle()
            }
        })
        .clone()
}

impl ServerHandle {
    /// Start the gateway.
    ///
    /// 1. Install the Prometheus metrics recorder
    /// 2. Open the key store and run migrations (if enabled)
    /// 3. Build the upstream client
    /// 4. Bind and serve the REST API
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        app_cfg.validate()?;

        info!("Starting Odia TTS gateway...");
        let prometheus = prometheus_handle();

        // ── Key store ──────────────────────────────────────────
        let db_config = DatabaseConfig {
            url: app_cfg.database.url.clone(),
        };
        info!("Key store: {}", redact_url(&db_config.url));
        let store = open_key_store(&db_config, opts.auto_migrate).await?;

        // ── Services ───────────────────────────────────────────
        let keys = Arc::new(KeyManager::new(store.repository, &app_cfg.security));
        let forwarder = Arc::new(SpeakForwarder::new(&app_cfg.upstream, &app_cfg.speak)?);

        if app_cfg.upstream.url.is_empty() {
            warn!("ODIA_TTS_URL is not set; /speak will fail until it is configured");
        } else {
            info!(
                method = ?app_cfg.upstream.method,
                timeout_secs = app_cfg.upstream.timeout_secs,
                "TTS upstream: {}",
                app_cfg.upstream.url
            );
        }
        if !app_cfg.admin_enabled() {
            warn!("ADMIN_BEARER is not set; key administration is disabled");
        }
        if !app_cfg.speak.require_key {
            warn!("REQUIRE_KEY_FOR_SPEAK is off; /speak is open to anyone");
        }
        if app_cfg.speak.dev_fallback_audio {
            warn!("DEV_FALLBACK_AUDIO is on; upstream failures return placeholder audio");
        }

        // ── Shutdown coordinator ───────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        // ── REST API server ────────────────────────────────────
        let state = GatewayState::new(&app_cfg, keys, forwarder, prometheus);
        let api_router = create_api_router(state, &app_cfg);

        let api_addr = app_cfg.server.address();
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_server = axum::serve(
            listener,
            api_router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            shutdown_signal.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        info!("🚀 Gateway started.");

        Ok(Self {
            config: app_cfg,
            local_addr,
            db: store.db,
            shutdown,
            api_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the shutdown signal, then drain the API server and close the
    /// database within the configured shutdown timeout.
    pub async fn wait(self) -> bool {
        let ServerHandle {
            shutdown,
            api_task,
            db,
            ..
        } = self;

        shutdown
            .shutdown_with_cleanup(|| async move {
                info!("⏳ Waiting for in-flight requests to complete...");
                match api_task.await {
                    Ok(()) => info!("REST API server stopped"),
                    Err(e) => error!("REST API server task panicked: {}", e),
                }

                if let Some(db) = db {
                    if let Err(e) = db.close().await {
                        warn!("Error closing database connection: {}", e);
                    } else {
                        info!("✅ Database connection closed");
                    }
                }
                info!("👋 Odia TTS gateway shutdown complete");
            })
            .await
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) -> bool {
        info!("🛑 Shutting down Odia TTS gateway...");
        self.trigger_shutdown();
        self.wait().await
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Initialize tracing (logging) from the application config.
///
/// `RUST_LOG` takes precedence over `logging.level`. Call once at startup.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let result = match config.logging.format.to_lowercase().as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init(),
    };
    if let Err(e) = result {
        eprintln!("tracing already initialised: {}", e);
    }
}
