//! Helpers for the accuracy metrics the forecasting service sends as text.
//!
//! The service formats MAPE as a percentage (`"15.23%"`) and RMSE as a plain
//! number (`"10.50"`). Both are passed through verbatim for display; these
//! helpers only extract a numeric trend value for the metric cards.

/// Parse a metric string into a number, ignoring a trailing `%`.
///
/// An empty string yields `0.0`, matching how the dashboard treats a missing
/// metric. Text that is not a number yields `None`.
pub(crate) fn parse_metric_value(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    let numeric = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    numeric.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metric_value_percentage() {
        assert_eq!(parse_metric_value("15.23%"), Some(15.23));
    }

    #[test]
    fn test_parse_metric_value_plain_number() {
        assert_eq!(parse_metric_value("10.50"), Some(10.5));
    }

    #[test]
    fn test_parse_metric_value_empty() {
        assert_eq!(parse_metric_value(""), Some(0.0));
        assert_eq!(parse_metric_value("   "), Some(0.0));
    }

    #[test]
    fn test_parse_metric_value_garbage() {
        assert_eq!(parse_metric_value("n/a"), None);
        assert_eq!(parse_metric_value("%"), None);
    }

    #[test]
    fn test_parse_metric_value_non_finite() {
        assert_eq!(parse_metric_value("NaN"), None);
        assert_eq!(parse_metric_value("inf%"), None);
    }

    #[test]
    fn test_parse_metric_value_whitespace_before_percent() {
        assert_eq!(parse_metric_value(" 7.5 % "), Some(7.5));
    }
}
