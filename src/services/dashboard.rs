//! Dashboard controller.
//!
//! Holds the load state for the product shown on the dashboard and builds the
//! view model (metric cards + timeline) from the latest snapshot.
//!
//! Loads can overlap when the tracked product changes while a request is in
//! flight. Each load takes a generation number when it starts; a response is
//! applied only if its generation is still the latest, so the last *started*
//! load always determines the state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use utoipa::ToSchema;

use crate::errors::CommunicationError;
use crate::helpers::parse_metric_value;
use crate::services::demand::{DemandClient, DemandSnapshot};
use crate::services::timeline::{build_timeline_rows, TimelineRow};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    /// No product has been requested yet.
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Dashboard load state.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub product_id: Option<i64>,
    pub status: LoadStatus,
    pub snapshot: Option<DemandSnapshot>,
    pub error: Option<String>,
    /// Generation of the most recently started load.
    pub generation: u64,
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            product_id: None,
            status: LoadStatus::Idle,
            snapshot: None,
            error: None,
            generation: 0,
            last_updated_at: None,
        }
    }

    /// Start a load for `product_id` and return its generation.
    pub fn begin(&mut self, product_id: i64) -> u64 {
        self.generation += 1;
        self.product_id = Some(product_id);
        self.status = LoadStatus::Loading;
        self.snapshot = None;
        self.error = None;
        self.generation
    }

    /// Apply the outcome of the load started as `generation`.
    ///
    /// Returns `false` without touching the state when a newer load has
    /// started since.
    pub fn complete(
        &mut self,
        generation: u64,
        result: Result<DemandSnapshot, CommunicationError>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }

        match result {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.error = None;
                self.status = LoadStatus::Ready;
            }
            Err(e) => {
                self.snapshot = None;
                self.error = Some(e.to_string());
                self.status = LoadStatus::Failed;
            }
        }
        self.last_updated_at = Some(Utc::now());
        true
    }
}

/// Shared dashboard state handle.
pub type SharedDashboardState = Arc<RwLock<DashboardState>>;

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// Headline metric shown at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MetricCard {
    pub title: String,
    pub value_kg: f64,
    pub unit: String,
    /// Trend figure derived from the model error metrics, when available.
    pub trend: Option<f64>,
    pub subtitle: String,
}

impl MetricCard {
    fn kg(title: &str, value_kg: f64, trend: Option<f64>, subtitle: String) -> Self {
        Self {
            title: title.to_string(),
            value_kg,
            unit: "kg".to_string(),
            trend,
            subtitle,
        }
    }
}

/// Everything the dashboard renders for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardView {
    pub product_id: i64,
    /// Date the snapshot was computed for (YYYY-MM-DD)
    pub query_date: String,
    pub metric_cards: Vec<MetricCard>,
    pub timeline: Vec<TimelineRow>,
    pub mape: String,
    pub rmse: String,
}

/// Build the three headline cards: pickup today, thawing, available today.
pub fn build_metric_cards(snapshot: &DemandSnapshot) -> Vec<MetricCard> {
    vec![
        MetricCard::kg(
            "Quantity to pick up today",
            snapshot.quantity_to_pickup_today_kg,
            parse_metric_value(&snapshot.mape),
            format!("MAPE: {}", snapshot.mape),
        ),
        MetricCard::kg(
            "Thawing",
            snapshot.quantity_thawing_kg,
            parse_metric_value(&snapshot.rmse),
            format!("RMSE: {}", snapshot.rmse),
        ),
        MetricCard::kg(
            "Available today",
            snapshot.quantity_available_today_kg,
            None,
            "Ready for distribution".to_string(),
        ),
    ]
}

pub fn build_dashboard_view(snapshot: &DemandSnapshot) -> DashboardView {
    DashboardView {
        product_id: snapshot.product_id,
        query_date: snapshot.query_date.clone(),
        metric_cards: build_metric_cards(snapshot),
        timeline: build_timeline_rows(&snapshot.forecast_next_days),
        mape: snapshot.mape.clone(),
        rmse: snapshot.rmse.clone(),
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Loads demand snapshots into the shared dashboard state.
#[derive(Debug, Clone)]
pub struct DashboardController {
    client: DemandClient,
    state: SharedDashboardState,
}

impl DashboardController {
    pub fn new(client: DemandClient) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(DashboardState::new())),
        }
    }

    /// Mark a load for `product_id` as started, without fetching yet.
    pub async fn begin(&self, product_id: i64) -> u64 {
        self.state.write().await.begin(product_id)
    }

    /// Load `product_id` into the dashboard and return the resulting state.
    pub async fn load(&self, product_id: i64) -> DashboardState {
        let generation = self.begin(product_id).await;
        self.fetch_and_apply(product_id, generation).await
    }

    /// Fetch for a load started with [`DashboardController::begin`].
    ///
    /// The lock is not held during the request.
    pub async fn fetch_and_apply(&self, product_id: i64, generation: u64) -> DashboardState {
        let result = self.client.fetch_demand_snapshot(product_id).await;

        let mut state = self.state.write().await;
        if state.complete(generation, result) {
            match state.status {
                LoadStatus::Ready => tracing::info!(
                    "Dashboard loaded product {} (generation {})",
                    product_id,
                    generation
                ),
                _ => tracing::warn!(
                    "Dashboard load for product {} failed (generation {})",
                    product_id,
                    generation
                ),
            }
        } else {
            tracing::debug!(
                "Discarding stale response for product {} (generation {}, current {})",
                product_id,
                generation,
                state.generation
            );
        }
        state.clone()
    }

    pub async fn state(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    /// View model for the current snapshot, if one is loaded.
    pub async fn view(&self) -> Option<DashboardView> {
        self.state
            .read()
            .await
            .snapshot
            .as_ref()
            .map(build_dashboard_view)
    }
}
