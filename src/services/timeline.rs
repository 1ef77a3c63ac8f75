//! Forecast-to-timeline mapping.
//!
//! Projects the first days of a forecast onto the fixed-size process
//! timeline shown on the dashboard. Labels and status depend only on the
//! position in the forecast, never on the values.

use serde::Serialize;
use utoipa::ToSchema;

use crate::services::demand::ForecastDayPoint;

/// Maximum number of rows the timeline can show.
pub const MAX_TIMELINE_ROWS: usize = 6;

/// Stage of a timeline row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Current,
    Pending,
}

/// Stage label and status by position; positions past the table use
/// `FUTURE_STAGE`.
const STAGES: [(&str, StageStatus); 3] = [
    ("available (forecast)", StageStatus::Current),
    ("thawing (forecast)", StageStatus::Pending),
    ("pickup (forecast)", StageStatus::Pending),
];

const FUTURE_STAGE: (&str, StageStatus) = ("future forecast", StageStatus::Pending);

/// One row of the process timeline.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TimelineRow {
    /// 1-based position in the timeline
    pub day: usize,
    /// Stage name, e.g. "thawing (forecast)"
    pub stage_label: String,
    /// Predicted quantity for the day in kg
    pub amount_kg: f64,
    pub status: StageStatus,
    /// Forecast date as sent by the service (YYYY-MM-DD)
    pub date: String,
}

/// Build the timeline rows for a forecast.
///
/// Uses at most the first `MAX_TIMELINE_ROWS` days. An empty forecast gives an
/// empty timeline.
pub fn build_timeline_rows(forecast_next_days: &[ForecastDayPoint]) -> Vec<TimelineRow> {
    forecast_next_days
        .iter()
        .take(MAX_TIMELINE_ROWS)
        .enumerate()
        .map(|(index, point)| {
            let (label, status) = STAGES.get(index).copied().unwrap_or(FUTURE_STAGE);
            TimelineRow {
                day: index + 1,
                stage_label: label.to_string(),
                amount_kg: point.predicted_kg,
                status,
                date: point.date.clone(),
            }
        })
        .collect()
}
