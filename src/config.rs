/// Default demand forecasting service, used when no override is set.
const DEFAULT_DEMAND_API_BASE_URL: &str = "https://api-matheus-quantumm.onrender.com";

/// Product tracked by the dashboard when none is configured.
const DEFAULT_PRODUCT_ID: i64 = 237478;

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the demand forecasting service (no trailing slash needed).
    pub demand_api_base_url: String,
    /// Product loaded into the dashboard at startup.
    pub product_id: i64,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            demand_api_base_url: std::env::var("DEMAND_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_DEMAND_API_BASE_URL.to_string()),
            product_id: std::env::var("DASHBOARD_PRODUCT_ID")
                .map(|v| v.parse().expect("DASHBOARD_PRODUCT_ID must be a valid integer"))
                .unwrap_or(DEFAULT_PRODUCT_ID),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid u16"),
        }
    }
}
