use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    extract::{RawQuery, State},
    response::Html,
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api;
use crate::config::{DefaultsConfig, MeteoDashConfig};
use crate::dashboard::{Dashboard, DashboardRequest};
use crate::render::html;
use crate::weather::{OpenMeteo, WeatherService};

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn WeatherService>,
    pub dashboard: Dashboard,
    pub defaults: Arc<DefaultsConfig>,
}

impl AppState {
    pub fn new(service: Arc<dyn WeatherService>, defaults: DefaultsConfig) -> Self {
        Self {
            dashboard: Dashboard::new(service.clone()),
            service,
            defaults: Arc::new(defaults),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .nest("/api", api::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn index(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Html<String> {
    let (request, outcome) =
        match DashboardRequest::from_query_string(raw.as_deref(), &state.defaults) {
            Ok(request) => {
                let outcome = state.dashboard.run(&request).await;
                (request, outcome)
            }
            Err(err) => (DashboardRequest::from_defaults(&state.defaults), Err(err)),
        };

    if let Err(err) = &outcome {
        warn!("Dashboard run failed [{}]: {}", err.code(), err);
    }
    Html(html::render_page(&request, &outcome))
}

pub async fn run(config: &MeteoDashConfig) -> anyhow::Result<()> {
    let service = Arc::new(OpenMeteo::new(config)?);
    let app = app(AppState::new(service, config.defaults.clone()));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Web server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down web server");
}
