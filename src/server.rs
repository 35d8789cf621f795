//! Festival service runtime
//!
//! [`ServerHandle`] owns the whole lifecycle: database connection and
//! migrations, the bootstrap organizer, service wiring, the REST API and
//! graceful shutdown.

use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::{init_database, run_migrations, SeaOrmRepositoryProvider};
use crate::interfaces::http::modules::metrics::describe_metrics;
use crate::interfaces::http::{create_api_router, AppState};
use crate::support::shutdown::{ShutdownCoordinator, ShutdownSignal};

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup
    pub auto_migrate: bool,
    /// Create the configured organizer when no user exists
    pub create_default_organizer: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_organizer: true,
        }
    }
}

/// Handle to a running festival service.
///
/// ```rust,no_run
/// use festival_api::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    pub config: AppConfig,
    /// Port the REST API is bound to
    pub api_port: u16,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

/// The global recorder can be installed once per process; restarts reuse it.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                describe_metrics();
                info!("Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!(error = %e, "Prometheus recorder unavailable, /metrics disabled");
                None
            }
        })
        .clone()
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let config = opts.config;
        config.validate()?;
        if config.uses_default_secret() {
            warn!("security.jwt_secret is the built-in default; set a real secret");
        }

        info!("Starting festival booking service");
        let metrics_handle = prometheus_handle();

        let db = init_database(&config.database_config()).await?;
        if opts.auto_migrate {
            run_migrations(&db).await?;
        }

        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let booking = config.booking_config();
        info!(
            lock_timeout_ms = booking.lock_timeout.as_millis() as u64,
            default_cancel_deadline_hours = booking.default_deadline.hours(),
            busy_retry_attempts = booking.busy_retry_attempts,
            "Booking configured"
        );
        let state = AppState::new(db.clone(), repos.clone(), config.jwt_config(), booking);

        if opts.create_default_organizer {
            match state
                .users
                .ensure_default_organizer(&config.admin.email, &config.admin.password)
                .await
            {
                Ok(Some(user)) => {
                    warn!(email = %user.email, "Default organizer created; change its password")
                }
                Ok(None) => {}
                Err(e) => error!(error = %e, "Failed to create default organizer"),
            }
        }

        let router = create_api_router(state, metrics_handle);

        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let listener = tokio::net::TcpListener::bind(config.api_address()).await?;
        let local = listener.local_addr()?;
        info!(address = %local, "REST API listening");
        info!("Swagger UI available at http://{}/docs/", local);

        let signal = shutdown.signal();
        let server = axum::serve(listener, router).with_graceful_shutdown(async move {
            signal.wait().await;
            info!("REST API received shutdown signal");
        });
        let api_task = tokio::spawn(async move {
            if let Err(e) = server.await {
                error!(error = %e, "REST API server error");
            }
        });

        Ok(Self {
            repos,
            config,
            api_port: local.port(),
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Trigger shutdown on SIGINT/SIGTERM.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for shutdown, drain in-flight requests (bounded by
    /// `server.shutdown_timeout`) and close the database.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            api_task,
            ..
        } = self;

        let drained = shutdown
            .drain(async move {
                if let Err(e) = api_task.await {
                    error!(error = %e, "REST API task panicked");
                }
            })
            .await;
        if !drained {
            warn!("In-flight requests abandoned at shutdown timeout");
        }

        if let Err(e) = db.close().await {
            warn!(error = %e, "Error closing database connection");
        } else {
            info!("Database connection closed");
        }
        info!("Festival booking service stopped");
    }

    pub async fn shutdown(self) {
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the config.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.logging.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    if installed.is_err() {
        warn!("Tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ServerOptions {
        let mut config = AppConfig::default();
        config.server.api_host = "127.0.0.1".into();
        config.server.api_port = 1;
        config.database.url = "sqlite::memory:".into();
        config.security.jwt_secret = "test-secret".into();
        ServerOptions {
            config,
            ..ServerOptions::default()
        }
    }

    #[tokio::test]
    async fn invalid_config_refuses_to_start() {
        let mut opts = options();
        opts.config.booking.lock_timeout_ms = 0;
        assert!(ServerHandle::start(opts).await.is_err());
    }

    #[tokio::test]
    async fn starts_seeds_and_stops() {
        let mut opts = options();
        opts.config.server.api_port = free_port().await;

        let handle = ServerHandle::start(opts).await.unwrap();
        assert!(handle.is_running());
        assert_eq!(handle.repos.users().count().await.unwrap(), 1);

        let addr = format!("127.0.0.1:{}", handle.api_port);
        assert!(tokio::net::TcpStream::connect(&addr).await.is_ok());

        handle.shutdown().await;
    }

    async fn free_port() -> u16 {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }
}
