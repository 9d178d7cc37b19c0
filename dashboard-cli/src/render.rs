use chrono::Local;
use dashboard_core::{ForecastEntry, Phase, PlaceCandidate, SessionState};
use std::fmt::Write;

/// Text rendering of the whole dashboard.
pub fn dashboard(state: &SessionState) -> String {
    let mut out = String::new();

    if let Phase::Error(err) = &state.phase {
        let _ = writeln!(out, "! {}", err.user_message());
        let _ = writeln!(out);
    }

    match &state.current_snapshot {
        Some(snapshot) => {
            let _ = writeln!(out, "{}", snapshot.location_label());
            let _ = writeln!(out, "  Temperature: {}", snapshot.temperature_label());
            let _ = writeln!(out, "  Weather:     {}", snapshot.condition_description);
            let _ = writeln!(out, "  Humidity:    {}%", snapshot.humidity_pct);
            let _ = writeln!(out, "  Wind Speed:  {} m/s", snapshot.wind_speed_mps);
            let _ = writeln!(out, "  Theme:       {}", state.theme);
        }
        None => {
            let _ = writeln!(out, "No location loaded yet.");
        }
    }

    let map = state.map_view();
    let _ = writeln!(out);
    match map.marker {
        Some(marker) => {
            let _ = writeln!(out, "Map: {} (zoom {}), marker at {}", map.center, map.zoom, marker);
        }
        None => {
            let _ = writeln!(out, "Map: world view (zoom {})", map.zoom);
        }
    }

    if !state.forecast_window.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Next hours:");
        for entry in &state.forecast_window {
            let _ = writeln!(out, "  {}", forecast_line(entry));
        }
    }

    out
}

fn forecast_line(entry: &ForecastEntry) -> String {
    let hour = entry.timestamp.with_timezone(&Local).format("%l %p");
    format!(
        "{:>5}  {:>7}  {}",
        hour.to_string().trim(),
        entry.temperature_label(),
        entry.condition_main
    )
}

/// Numbered list of place candidates.
pub fn candidates(candidates: &[PlaceCandidate]) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{:>2}. {}\n", i + 1, c.label()))
        .collect()
}

/// Machine-readable view of the loaded dashboard.
pub fn json(state: &SessionState) -> serde_json::Value {
    let map = state.map_view();

    serde_json::json!({
        "phase": state.phase.name(),
        "error": state.error().map(|e| e.to_string()),
        "snapshot": state.current_snapshot,
        "forecast": state.forecast_window,
        "theme": state.theme,
        "map": {
            "center": map.center,
            "zoom": map.zoom,
            "marker": map.marker,
        },
    })
}
