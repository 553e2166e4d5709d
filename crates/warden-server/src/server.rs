use std::{net::SocketAddr, sync::Arc};

use axum::{Router, ServiceExt, extract::Request, middleware, routing::get};
use tower_http::{normalize_path::NormalizePath, trace::TraceLayer};
use warden_auth::{BasicAuthState, InMemoryUserDirectory, UserDirectory, basic_auth};

use crate::{bootstrap, config::AppConfig, handlers};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn UserDirectory>,
}

/// Router wrapped so `/x/` and `/x` reach the same route.
pub type WardenApp = NormalizePath<Router>;

pub struct WardenServer {
    addr: SocketAddr,
    app: WardenApp,
}

/// Builds the API router.
///
/// Trailing slashes are trimmed before route matching.
pub fn build_app(cfg: &AppConfig, directory: Arc<dyn UserDirectory>) -> WardenApp {
    let app = Router::new()
        .route("/api/v1/status", get(handlers::status))
        .route("/api/v1/stats", get(handlers::stats))
        .route("/api/v1/unauthorized", get(handlers::unauthorized))
        .route("/api/v1/forbidden", get(handlers::forbidden))
        .route("/api/v1/users", get(handlers::list_users))
        .route("/api/v1/users/me", get(handlers::current_user))
        .route("/api/v1/users/{id}", get(handlers::get_user))
        .fallback(handlers::not_found)
        .with_state(AppState {
            directory: directory.clone(),
        });

    let app = if cfg.auth.enabled {
        let auth_state = BasicAuthState::from_config(&cfg.auth, directory);
        app.layer(middleware::from_fn_with_state(auth_state, basic_auth))
    } else {
        tracing::warn!("Basic authentication disabled, all requests are unauthenticated");
        app
    };

    let app = app.layer(
        TraceLayer::new_for_http().make_span_with(|req: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                http.method = %req.method(),
                http.target = %req.uri(),
            )
        }),
    );

    NormalizePath::trim_trailing_slash(app)
}

pub struct ServerBuilder {
    config: AppConfig,
    directory: Option<Arc<dyn UserDirectory>>,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            directory: None,
        }
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.config = cfg;
        self
    }

    /// Uses an existing directory instead of a fresh in-memory one.
    pub fn with_directory(mut self, directory: Arc<dyn UserDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Seeds the directory from `bootstrap.users` and builds the router.
    pub async fn build(self) -> anyhow::Result<WardenServer> {
        let directory = self
            .directory
            .unwrap_or_else(|| Arc::new(InMemoryUserDirectory::new()) as Arc<dyn UserDirectory>);

        let stats =
            bootstrap::bootstrap_users(directory.as_ref(), &self.config.bootstrap.users).await?;
        tracing::info!(
            created = stats.created,
            skipped = stats.skipped,
            "User directory bootstrapped"
        );

        Ok(WardenServer {
            addr: self.config.addr(),
            app: build_app(&self.config, directory),
        })
    }
}

impl WardenServer {
    pub fn router(&self) -> WardenApp {
        self.app.clone()
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(
            listener,
            ServiceExt::<Request>::into_make_service(self.app),
        )
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
