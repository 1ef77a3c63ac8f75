//! Dashboard HTTP endpoints.
//!
//! - GET  /api/v1/dashboard                       current load state and view
//! - GET  /api/v1/dashboard/view                  view model only (404 until loaded)
//! - POST /api/v1/dashboard/product/:product_id   switch product, load in background

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use super::AppState;
use crate::errors::{AppError, ErrorResponse};
use crate::services::dashboard::{build_dashboard_view, DashboardState, DashboardView, LoadStatus};

/// Dashboard load state with the rendered view when data is available.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    /// Product currently tracked (null before the first load)
    pub product_id: Option<i64>,
    pub status: LoadStatus,
    /// Communication error message when `status` is "failed"
    pub error: Option<String>,
    /// Generation of the latest started load
    pub generation: u64,
    /// When the latest load completed (ISO 8601)
    pub last_updated_at: Option<String>,
    /// Metric cards and timeline. Null unless `status` is "ready".
    pub view: Option<DashboardView>,
}

impl From<&DashboardState> for DashboardResponse {
    fn from(s: &DashboardState) -> Self {
        Self {
            product_id: s.product_id,
            status: s.status,
            error: s.error.clone(),
            generation: s.generation,
            last_updated_at: s.last_updated_at.map(|t| t.to_rfc3339()),
            view: s.snapshot.as_ref().map(build_dashboard_view),
        }
    }
}

/// Get the current dashboard state.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Current dashboard state", body = DashboardResponse),
    )
)]
pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let s = state.dashboard.state().await;
    Json(DashboardResponse::from(&s))
}

/// Get the dashboard view for the loaded snapshot.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/view",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Metric cards and timeline", body = DashboardView),
        (status = 404, description = "No demand data loaded", body = ErrorResponse),
    )
)]
pub async fn get_dashboard_view(
    State(state): State<AppState>,
) -> Result<Json<DashboardView>, AppError> {
    if let Some(view) = state.dashboard.view().await {
        return Ok(Json(view));
    }

    let s = state.dashboard.state().await;
    let message = match s.product_id {
        Some(id) => format!("No demand data available for product {}", id),
        None => "No product selected".to_string(),
    };
    Err(AppError::NotFound(message))
}

/// Switch the dashboard to another product.
///
/// Starts a load in the background and returns immediately with the
/// `loading` state. A load started earlier for any product is superseded.
#[utoipa::path(
    post,
    path = "/api/v1/dashboard/product/{product_id}",
    tag = "Dashboard",
    params(
        ("product_id" = i64, Path, description = "Product identifier"),
    ),
    responses(
        (status = 202, description = "Load started", body = DashboardResponse),
    )
)]
pub async fn select_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> (StatusCode, Json<DashboardResponse>) {
    let generation = state.dashboard.begin(product_id).await;
    let s = state.dashboard.state().await;

    let dashboard = state.dashboard.clone();
    tokio::spawn(async move {
        dashboard.fetch_and_apply(product_id, generation).await;
    });

    (StatusCode::ACCEPTED, Json(DashboardResponse::from(&s)))
}
