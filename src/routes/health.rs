use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use super::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status ("ok" when the process is serving requests)
    pub status: String,
    /// API version
    pub version: String,
    /// Demand forecasting service this instance talks to
    pub upstream_base_url: String,
}

/// Health check endpoint.
///
/// Does not call the forecasting service; upstream failures surface on the
/// demand and dashboard endpoints instead.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        upstream_base_url: state.demand_client.base_url().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::dashboard::DashboardController;
    use crate::services::demand::DemandClient;

    #[tokio::test]
    async fn test_health_check() {
        let client = DemandClient::new("http://localhost:8000/");
        let state = AppState {
            dashboard: DashboardController::new(client.clone()),
            demand_client: client,
        };

        let Json(body) = health_check(State(state)).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(body.upstream_base_url, "http://localhost:8000");
    }
}
