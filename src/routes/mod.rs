pub mod dashboard;
pub mod demand;
pub mod health;

use crate::services::dashboard::DashboardController;
use crate::services::demand::DemandClient;

/// Shared application state for all endpoints.
#[derive(Debug, Clone)]
pub struct AppState {
    pub(crate) demand_client: DemandClient,
    pub(crate) dashboard: DashboardController,
}
