use crate::model::ForecastEntry;

/// Number of 3-hour steps shown, roughly the next 24 hours.
pub const FORECAST_WINDOW_LEN: usize = 8;

/// Keep the first [`FORECAST_WINDOW_LEN`] entries in their original order.
pub fn window(entries: &[ForecastEntry]) -> Vec<ForecastEntry> {
    entries.iter().take(FORECAST_WINDOW_LEN).cloned().collect()
}
