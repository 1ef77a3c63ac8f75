// Demand Dashboard API v0.1
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod errors;
mod helpers;
mod routes;
mod services;

use config::AppConfig;
use routes::AppState;
use services::dashboard::DashboardController;
use services::demand::DemandClient;

/// Demand Dashboard API — OpenAPI specification.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Demand Dashboard API",
        version = "0.1.0",
        description = "Demand-forecast dashboard for a tracked product. \
            Fetches demand snapshots from the forecasting service, exposes \
            headline quantities (pickup, thawing, available) with model error \
            metrics, and maps the next forecast days onto a process timeline.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Demand", description = "Live demand snapshots from the forecasting service"),
        (name = "Dashboard", description = "Dashboard state for the tracked product"),
    ),
    paths(
        routes::health::health_check,
        routes::demand::get_demand_snapshot,
        routes::demand::get_demand_timeline,
        routes::dashboard::get_dashboard,
        routes::dashboard::get_dashboard_view,
        routes::dashboard::select_product,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::demand::ForecastDayResponse,
            routes::demand::DemandSnapshotResponse,
            routes::dashboard::DashboardResponse,
            services::dashboard::LoadStatus,
            services::dashboard::MetricCard,
            services::dashboard::DashboardView,
            services::timeline::StageStatus,
            services::timeline::TimelineRow,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demand_dashboard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        "Using demand forecasting service at {}",
        config.demand_api_base_url
    );

    let demand_client = DemandClient::new(&config.demand_api_base_url);
    let dashboard = DashboardController::new(demand_client.clone());

    // Initial load for the configured product; the server starts serving
    // right away and reports `loading` until it completes.
    let initial = dashboard.clone();
    let product_id = config.product_id;
    tokio::spawn(async move {
        initial.load(product_id).await;
    });

    let app_state = AppState {
        demand_client,
        dashboard,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/v1/health", get(routes::health::health_check))
        .route(
            "/api/v1/demand/:product_id",
            get(routes::demand::get_demand_snapshot),
        )
        .route(
            "/api/v1/demand/:product_id/timeline",
            get(routes::demand::get_demand_timeline),
        )
        .route("/api/v1/dashboard", get(routes::dashboard::get_dashboard))
        .route(
            "/api/v1/dashboard/view",
            get(routes::dashboard::get_dashboard_view),
        )
        .route(
            "/api/v1/dashboard/product/:product_id",
            post(routes::dashboard::select_product),
        )
        .with_state(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
