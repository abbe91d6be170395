//! Rendering of a surveillance snapshot into the chatbot context block.
//!
//! Sections appear in a fixed order and every number carries its unit
//! (°C, %, mm, per 1000). Long lists are capped at [`MAX_LIST_ITEMS`] and
//! the whole block at [`MAX_CONTEXT_BYTES`]. The weather section is left
//! out entirely when the forecast is empty.

use std::fmt::Write as _;

use dengue_watch_analytics_models::SurveillanceSnapshot;

/// Upper bound on the rendered context, in bytes.
pub const MAX_CONTEXT_BYTES: usize = 8_000;

/// Entries rendered per list section.
pub const MAX_LIST_ITEMS: usize = 15;

const TRUNCATION_MARKER: &str = "\n[context truncated]";

fn fmt_optional(value: Option<f64>, suffix: &str) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}{suffix}"))
}

#[allow(clippy::cast_precision_loss)]
fn per_thousand(cases: f64, population: i64) -> f64 {
    if population > 0 {
        cases / population as f64 * 1000.0
    } else {
        0.0
    }
}

fn push_overview(out: &mut String, snapshot: &SurveillanceSnapshot) {
    let s = &snapshot.stats;
    let _ = writeln!(out, "CASE OVERVIEW (last {} days)", s.days);
    let _ = writeln!(out, "- Total cases (all time): {}", s.total_cases);
    let _ = writeln!(
        out,
        "- Active: {}, Recovered: {}, Deceased: {}",
        s.active_cases, s.recovered_cases, s.deceased_cases
    );
    let _ = writeln!(
        out,
        "- Severe: {}, Hospitalized: {}",
        s.severe_cases, s.hospitalized_cases
    );
    let _ = writeln!(out, "- Registered patients: {}", s.total_patients);
    let _ = writeln!(
        out,
        "- Cases reported in period: {} across {} barangay(s)",
        s.cases_in_period, s.barangays_affected
    );
}

fn push_alerts(out: &mut String, snapshot: &SurveillanceSnapshot) {
    out.push_str("\nACTIVE ALERTS\n");
    if snapshot.alerts.is_empty() {
        out.push_str("- None\n");
    }
    for alert in snapshot.alerts.iter().take(MAX_LIST_ITEMS) {
        let _ = writeln!(
            out,
            "- {} [{}]: {} case(s), {} active",
            alert.barangay,
            alert.level.as_ref().to_uppercase(),
            alert.cases,
            alert.active_cases
        );
    }
}

fn push_barangays(out: &mut String, snapshot: &SurveillanceSnapshot) {
    if snapshot.barangay_data.is_empty() {
        return;
    }
    let _ = writeln!(
        out,
        "\nCASES BY BARANGAY (last {} days)",
        snapshot.stats.days
    );
    for row in snapshot.barangay_data.iter().take(MAX_LIST_ITEMS) {
        let _ = writeln!(
            out,
            "- {}: {} case(s), {} active",
            row.barangay, row.total, row.active
        );
    }
}

fn push_age_groups(out: &mut String, snapshot: &SurveillanceSnapshot) {
    if snapshot.age_groups.is_empty() {
        return;
    }
    out.push_str("\nAGE DISTRIBUTION\n");
    for group in &snapshot.age_groups {
        let _ = writeln!(out, "- {}: {} case(s)", group.age_group, group.count);
    }
}

fn push_trend(out: &mut String, snapshot: &SurveillanceSnapshot) {
    let trend = &snapshot.weekly_trend;
    if trend.weeks.is_empty() {
        return;
    }
    out.push_str("\nWEEKLY TREND\n");
    for week in &trend.weeks {
        let _ = writeln!(
            out,
            "- {} to {}: {} case(s)",
            week.week_start, week.week_end, week.count
        );
    }
    let _ = writeln!(
        out,
        "- Change vs previous week: {:+.1}% ({})",
        trend.percent_change, trend.direction
    );
}

fn push_weather(out: &mut String, snapshot: &SurveillanceSnapshot) {
    if snapshot.weather.is_empty() {
        return;
    }
    out.push_str("\nWEATHER FORECAST\n");
    for day in snapshot.weather.iter().take(MAX_LIST_ITEMS) {
        let _ = writeln!(
            out,
            "- {}: {:.1}°C ({:.1}-{:.1}°C), {:.1}% humidity, {:.1} mm rain, {}",
            day.date,
            day.temperature,
            day.temperature_min,
            day.temperature_max,
            day.humidity,
            day.rainfall_mm,
            day.condition
        );
    }
}

fn push_fleet(out: &mut String, snapshot: &SurveillanceSnapshot) {
    if snapshot.fleet.is_empty() {
        return;
    }
    out.push_str("\nPREDICTED CASES BY BARANGAY (current weather)\n");
    for entry in snapshot.fleet.iter().take(MAX_LIST_ITEMS) {
        let cases = entry.prediction.predicted_cases;
        let _ = writeln!(
            out,
            "- {}: {:.2} case(s), {:.2} per 1000, {} risk (population {}{})",
            entry.barangay,
            cases,
            per_thousand(cases, entry.population),
            entry.prediction.risk_tier,
            entry.population,
            if entry.population_estimated {
                ", estimated"
            } else {
                ""
            }
        );
    }
}

fn push_model(out: &mut String, snapshot: &SurveillanceSnapshot) {
    let m = &snapshot.model_performance;
    out.push_str("\nPREDICTION MODEL PERFORMANCE\n");
    let _ = writeln!(
        out,
        "- Samples: {}, Mean error: {:.2}, Mean absolute error: {:.2}",
        m.sample_count, m.mean_error, m.mean_absolute_error
    );
    let _ = writeln!(
        out,
        "- R²: {}, Accuracy: {}",
        fmt_optional(m.r_squared, ""),
        fmt_optional(m.accuracy_percentage, "%")
    );
}

fn push_saved_predictions(out: &mut String, snapshot: &SurveillanceSnapshot) {
    if snapshot.recent_predictions.is_empty() {
        return;
    }
    out.push_str("\nSAVED PREDICTIONS\n");
    for p in &snapshot.recent_predictions {
        let _ = writeln!(
            out,
            "- {}: {:.2} case(s), {} risk, {:.1}% confidence ({})",
            p.prediction_date, p.predicted_cases, p.risk_level, p.confidence_level, p.weather_factor
        );
    }
}

fn push_officials(out: &mut String, snapshot: &SurveillanceSnapshot) {
    if snapshot.officials.is_empty() {
        return;
    }
    out.push_str("\nBARANGAY OFFICIALS\n");
    for official in snapshot.officials.iter().take(MAX_LIST_ITEMS) {
        let _ = write!(out, "- {}, {}", official.name, official.position);
        if let Some(barangay) = &official.barangay {
            let _ = write!(out, " ({barangay})");
        }
        if let Some(contact) = &official.contact_number {
            let _ = write!(out, ", contact {contact}");
        }
        out.push('\n');
    }
}

/// Cuts `text` to at most `max` bytes on a line boundary, appending a
/// marker when anything was removed.
#[must_use]
pub fn truncate_context(text: String, max: usize) -> String {
    if text.len() <= max {
        return text;
    }

    let mut end = max.saturating_sub(TRUNCATION_MARKER.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let end = text[..end].rfind('\n').unwrap_or(end);

    let mut out = text[..end].to_string();
    out.push_str(TRUNCATION_MARKER);
    out
}

/// Renders the snapshot as the context block injected into the prompt.
#[must_use]
pub fn build_context(snapshot: &SurveillanceSnapshot) -> String {
    let mut out = format!(
        "=== DENGUE SURVEILLANCE DATA (as of {}) ===\n\n",
        snapshot.as_of
    );

    push_overview(&mut out, snapshot);
    push_alerts(&mut out, snapshot);
    push_barangays(&mut out, snapshot);
    push_age_groups(&mut out, snapshot);
    push_trend(&mut out, snapshot);
    push_weather(&mut out, snapshot);
    push_fleet(&mut out, snapshot);
    push_model(&mut out, snapshot);
    push_saved_predictions(&mut out, snapshot);
    push_officials(&mut out, snapshot);

    truncate_context(out, MAX_CONTEXT_BYTES)
}
