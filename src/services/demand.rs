//! Demand forecasting service client.
//!
//! Fetches the demand snapshot for one product from
//! `GET <base-url>/demand_info/{product_id}`. One attempt per call: no retry,
//! no timeout, no caching.

use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

use crate::errors::CommunicationError;

// --- Wire types (service key names) ---

/// One predicted day in the forecast horizon.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastDayPoint {
    /// Calendar date, `YYYY-MM-DD`, kept as sent by the service.
    #[serde(rename = "data")]
    pub date: String,
    #[serde(rename = "previsao_kg")]
    pub predicted_kg: f64,
    #[serde(rename = "limite_inferior_kg")]
    pub lower_bound_kg: f64,
    #[serde(rename = "limite_superior_kg")]
    pub upper_bound_kg: f64,
}

/// One response from the forecasting service. Never modified after decoding.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DemandSnapshot {
    #[serde(rename = "id_produto")]
    pub product_id: i64,
    #[serde(rename = "data_consulta")]
    pub query_date: String,
    #[serde(rename = "qtd_a_retirar_hoje_kg")]
    pub quantity_to_pickup_today_kg: f64,
    #[serde(rename = "qtd_em_descongelamento_kg")]
    pub quantity_thawing_kg: f64,
    #[serde(rename = "qtd_disponivel_para_venda_hoje_kg")]
    pub quantity_available_today_kg: f64,
    /// Chronological forecast, possibly empty.
    #[serde(rename = "previsao_proximos_dias")]
    pub forecast_next_days: Vec<ForecastDayPoint>,
    /// Mean absolute percentage error, e.g. `"15.23%"`.
    pub mape: String,
    /// Root mean squared error, e.g. `"10.50"`.
    pub rmse: String,
}

// --- Failure reporting ---

/// Receives every failed fetch before the error is returned to the caller.
pub trait FailureObserver: fmt::Debug + Send + Sync {
    fn on_failure(&self, product_id: i64, error: &CommunicationError);
}

/// Default observer: logs the failure through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl FailureObserver for TracingObserver {
    fn on_failure(&self, product_id: i64, error: &CommunicationError) {
        match error.status_code() {
            Some(status) => tracing::error!(
                "Demand API request for product {} failed with HTTP {}: {}",
                product_id,
                status,
                error
            ),
            None => tracing::error!(
                "Demand API request for product {} failed ({}): {}",
                product_id,
                error.cause(),
                error
            ),
        }
    }
}

// --- Client ---

/// Client for the demand forecasting service.
#[derive(Debug, Clone)]
pub struct DemandClient {
    client: reqwest::Client,
    base_url: String,
    observer: Arc<dyn FailureObserver>,
}

impl DemandClient {
    /// Client that logs failures through `tracing`.
    pub fn new(base_url: &str) -> Self {
        Self::with_observer(base_url, Arc::new(TracingObserver))
    }

    pub fn with_observer(base_url: &str, observer: Arc<dyn FailureObserver>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            observer,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the current demand snapshot for a product.
    ///
    /// The id is forwarded as-is. Every failure is reported to the observer
    /// and then returned; a partial snapshot is never produced.
    pub async fn fetch_demand_snapshot(
        &self,
        product_id: i64,
    ) -> Result<DemandSnapshot, CommunicationError> {
        let result = self.request_snapshot(product_id).await;
        if let Err(e) = &result {
            self.observer.on_failure(product_id, e);
        }
        result
    }

    async fn request_snapshot(
        &self,
        product_id: i64,
    ) -> Result<DemandSnapshot, CommunicationError> {
        let url = format!("{}/demand_info/{}", self.base_url, product_id);
        tracing::debug!("Fetching demand snapshot from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CommunicationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Best effort: an unreadable body is reported like an empty one.
            let body = response.text().await.unwrap_or_default();
            return Err(CommunicationError::status(status.as_u16(), &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CommunicationError::Transport(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| CommunicationError::Decode(e.to_string()))
    }
}

/// Service-shaped JSON for a four-day forecast, shared by tests.
#[cfg(test)]
pub(crate) fn sample_snapshot_json(product_id: i64) -> serde_json::Value {
    serde_json::json!({
        "id_produto": product_id,
        "data_consulta": "2024-01-01",
        "qtd_a_retirar_hoje_kg": 120.5,
        "qtd_em_descongelamento_kg": 80.0,
        "qtd_disponivel_para_venda_hoje_kg": 95.25,
        "previsao_proximos_dias": [
            { "data": "2024-01-01", "previsao_kg": 100.0, "limite_inferior_kg": 90.0, "limite_superior_kg": 110.0 },
            { "data": "2024-01-02", "previsao_kg": 80.0, "limite_inferior_kg": 70.0, "limite_superior_kg": 90.0 },
            { "data": "2024-01-03", "previsao_kg": 50.0, "limite_inferior_kg": 40.0, "limite_superior_kg": 60.0 },
            { "data": "2024-01-04", "previsao_kg": 40.0, "limite_inferior_kg": 30.0, "limite_superior_kg": 50.0 }
        ],
        "mape": "15.23%",
        "rmse": "10.50"
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Default)]
    struct RecordingObserver {
        failures: Mutex<Vec<(i64, CommunicationError)>>,
    }

    impl FailureObserver for RecordingObserver {
        fn on_failure(&self, product_id: i64, error: &CommunicationError) {
            self.failures
                .lock()
                .unwrap()
                .push((product_id, error.clone()));
        }
    }

    async fn mount(server: &MockServer, product_id: i64, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(format!("/demand_info/{}", product_id)))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_decodes_snapshot_verbatim() {
        let server = MockServer::start().await;
        mount(
            &server,
            237478,
            ResponseTemplate::new(200).set_body_json(sample_snapshot_json(237478)),
        )
        .await;

        let client = DemandClient::new(&server.uri());
        let snapshot = client.fetch_demand_snapshot(237478).await.unwrap();

        assert_eq!(snapshot.product_id, 237478);
        assert_eq!(snapshot.query_date, "2024-01-01");
        assert_eq!(snapshot.quantity_to_pickup_today_kg, 120.5);
        assert_eq!(snapshot.quantity_thawing_kg, 80.0);
        assert_eq!(snapshot.quantity_available_today_kg, 95.25);
        assert_eq!(snapshot.mape, "15.23%");
        assert_eq!(snapshot.rmse, "10.50");
        assert_eq!(snapshot.forecast_next_days.len(), 4);
        assert_eq!(
            snapshot.forecast_next_days[1],
            ForecastDayPoint {
                date: "2024-01-02".to_string(),
                predicted_kg: 80.0,
                lower_bound_kg: 70.0,
                upper_bound_kg: 90.0,
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_keeps_out_of_order_bounds() {
        // Bounds are trusted as sent, even when they contradict the prediction.
        let mut body = sample_snapshot_json(7);
        body["previsao_proximos_dias"] = serde_json::json!([
            { "data": "not-a-date", "previsao_kg": 10.0, "limite_inferior_kg": 20.0, "limite_superior_kg": 5.0 }
        ]);
        let server = MockServer::start().await;
        mount(&server, 7, ResponseTemplate::new(200).set_body_json(body)).await;

        let snapshot = DemandClient::new(&server.uri())
            .fetch_demand_snapshot(7)
            .await
            .unwrap();
        let day = &snapshot.forecast_next_days[0];
        assert_eq!(day.date, "not-a-date");
        assert_eq!(day.lower_bound_kg, 20.0);
        assert_eq!(day.upper_bound_kg, 5.0);
    }

    #[tokio::test]
    async fn test_fetch_not_found_reports_status_and_body() {
        let server = MockServer::start().await;
        mount(
            &server,
            237478,
            ResponseTemplate::new(404).set_body_string("not found"),
        )
        .await;

        let observer = Arc::new(RecordingObserver::default());
        let client = DemandClient::with_observer(&server.uri(), observer.clone());
        let err = client.fetch_demand_snapshot(237478).await.unwrap_err();

        assert_eq!(err.status_code(), Some(404));
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("not found"));
        assert!(msg.starts_with("API communication failure: "));

        let failures = observer.failures.lock().unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0], (237478, err.clone()));
    }

    #[tokio::test]
    async fn test_fetch_empty_error_body_uses_placeholder() {
        let server = MockServer::start().await;
        mount(&server, 1, ResponseTemplate::new(503)).await;

        let err = DemandClient::new(&server.uri())
            .fetch_demand_snapshot(1)
            .await
            .unwrap_err();

        assert_eq!(err, CommunicationError::status(503, ""));
        assert!(err.to_string().contains("503 - empty response"));
    }

    #[tokio::test]
    async fn test_fetch_non_json_body_is_decode_error() {
        let server = MockServer::start().await;
        mount(
            &server,
            1,
            ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"),
        )
        .await;

        let err = DemandClient::new(&server.uri())
            .fetch_demand_snapshot(1)
            .await
            .unwrap_err();
        assert!(matches!(err, CommunicationError::Decode(_)));
        assert!(err.to_string().starts_with("API communication failure: "));
    }

    #[tokio::test]
    async fn test_fetch_schema_mismatch_is_decode_error() {
        let server = MockServer::start().await;
        mount(
            &server,
            1,
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id_produto": 1 })),
        )
        .await;

        let err = DemandClient::new(&server.uri())
            .fetch_demand_snapshot(1)
            .await
            .unwrap_err();
        assert!(matches!(err, CommunicationError::Decode(_)));
        assert!(err.to_string().contains("data_consulta"));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_transport_error() {
        let observer = Arc::new(RecordingObserver::default());
        // Port 1 on loopback is never listening in the test environment.
        let client = DemandClient::with_observer("http://127.0.0.1:1", observer.clone());

        let err = client.fetch_demand_snapshot(5).await.unwrap_err();
        assert!(matches!(err, CommunicationError::Transport(_)));
        assert_eq!(observer.failures.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_forwards_any_integer() {
        let server = MockServer::start().await;
        mount(
            &server,
            -3,
            ResponseTemplate::new(200).set_body_json(sample_snapshot_json(-3)),
        )
        .await;

        let snapshot = DemandClient::new(&server.uri())
            .fetch_demand_snapshot(-3)
            .await
            .unwrap();
        assert_eq!(snapshot.product_id, -3);
    }

    #[tokio::test]
    async fn test_success_does_not_notify_observer() {
        let server = MockServer::start().await;
        mount(
            &server,
            2,
            ResponseTemplate::new(200).set_body_json(sample_snapshot_json(2)),
        )
        .await;

        let observer = Arc::new(RecordingObserver::default());
        let client = DemandClient::with_observer(&server.uri(), observer.clone());
        client.fetch_demand_snapshot(2).await.unwrap();

        assert!(observer.failures.lock().unwrap().is_empty());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = DemandClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
