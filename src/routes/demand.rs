//! Demand snapshot HTTP endpoints.
//!
//! Each request performs a fresh fetch from the forecasting service.
//!
//! - GET /api/v1/demand/:product_id
//! - GET /api/v1/demand/:product_id/timeline

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use super::AppState;
use crate::errors::{AppError, ErrorResponse};
use crate::services::demand::{DemandSnapshot, ForecastDayPoint};
use crate::services::timeline::{build_timeline_rows, TimelineRow};

/// One predicted day.
#[derive(Debug, Serialize, ToSchema)]
pub struct ForecastDayResponse {
    /// Forecast date (YYYY-MM-DD)
    pub date: String,
    /// Predicted quantity in kg
    pub predicted_kg: f64,
    /// Lower confidence bound in kg
    pub lower_bound_kg: f64,
    /// Upper confidence bound in kg
    pub upper_bound_kg: f64,
}

impl From<ForecastDayPoint> for ForecastDayResponse {
    fn from(p: ForecastDayPoint) -> Self {
        Self {
            date: p.date,
            predicted_kg: p.predicted_kg,
            lower_bound_kg: p.lower_bound_kg,
            upper_bound_kg: p.upper_bound_kg,
        }
    }
}

/// Demand snapshot for a product, as returned by the forecasting service.
#[derive(Debug, Serialize, ToSchema)]
pub struct DemandSnapshotResponse {
    pub product_id: i64,
    /// Date the snapshot was computed for (YYYY-MM-DD)
    pub query_date: String,
    /// Quantity to take out of the freezer today in kg
    pub quantity_to_pickup_today_kg: f64,
    /// Quantity currently thawing in kg
    pub quantity_thawing_kg: f64,
    /// Quantity available for sale today in kg
    pub quantity_available_today_kg: f64,
    pub forecast_next_days: Vec<ForecastDayResponse>,
    /// Mean absolute percentage error, as formatted by the service (e.g. "15.23%")
    pub mape: String,
    /// Root mean squared error, as formatted by the service (e.g. "10.50")
    pub rmse: String,
}

impl From<DemandSnapshot> for DemandSnapshotResponse {
    fn from(s: DemandSnapshot) -> Self {
        Self {
            product_id: s.product_id,
            query_date: s.query_date,
            quantity_to_pickup_today_kg: s.quantity_to_pickup_today_kg,
            quantity_thawing_kg: s.quantity_thawing_kg,
            quantity_available_today_kg: s.quantity_available_today_kg,
            forecast_next_days: s
                .forecast_next_days
                .into_iter()
                .map(ForecastDayResponse::from)
                .collect(),
            mape: s.mape,
            rmse: s.rmse,
        }
    }
}

/// Fetch the demand snapshot for a product.
#[utoipa::path(
    get,
    path = "/api/v1/demand/{product_id}",
    tag = "Demand",
    params(
        ("product_id" = i64, Path, description = "Product identifier"),
    ),
    responses(
        (status = 200, description = "Current demand snapshot", body = DemandSnapshotResponse),
        (status = 502, description = "Forecasting service unreachable or returned an error", body = ErrorResponse),
    )
)]
pub async fn get_demand_snapshot(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<DemandSnapshotResponse>, AppError> {
    let snapshot = state.demand_client.fetch_demand_snapshot(product_id).await?;
    Ok(Json(snapshot.into()))
}

/// Fetch the demand snapshot and return its process timeline (at most 6 rows).
#[utoipa::path(
    get,
    path = "/api/v1/demand/{product_id}/timeline",
    tag = "Demand",
    params(
        ("product_id" = i64, Path, description = "Product identifier"),
    ),
    responses(
        (status = 200, description = "Timeline rows for the forecast", body = Vec<TimelineRow>),
        (status = 502, description = "Forecasting service unreachable or returned an error", body = ErrorResponse),
    )
)]
pub async fn get_demand_timeline(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<Vec<TimelineRow>>, AppError> {
    let snapshot = state.demand_client.fetch_demand_snapshot(product_id).await?;
    Ok(Json(build_timeline_rows(&snapshot.forecast_next_days)))
}
