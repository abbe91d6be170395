//! Outbreak alert classification.

use std::fmt::Write as _;

use dengue_watch_analytics_models::{AlertLevel, CaseAlert};
use dengue_watch_database_models::BarangayCaseCount;

/// Minimum cases in the window for an [`AlertLevel::Watch`] alert.
pub const WATCH_THRESHOLD: i64 = 5;
/// Minimum cases in the window for an [`AlertLevel::Warning`] alert.
pub const WARNING_THRESHOLD: i64 = 10;
/// Minimum cases in the window for an [`AlertLevel::Outbreak`] alert.
pub const OUTBREAK_THRESHOLD: i64 = 20;

/// Alert level for a case count, or `None` below [`WATCH_THRESHOLD`].
#[must_use]
pub const fn level_for(cases: i64) -> Option<AlertLevel> {
    if cases >= OUTBREAK_THRESHOLD {
        Some(AlertLevel::Outbreak)
    } else if cases >= WARNING_THRESHOLD {
        Some(AlertLevel::Warning)
    } else if cases >= WATCH_THRESHOLD {
        Some(AlertLevel::Watch)
    } else {
        None
    }
}

/// Builds alerts from per-barangay counts, most urgent first. Ties keep
/// the input order.
#[must_use]
pub fn alerts_from_counts(counts: &[BarangayCaseCount], days: u32) -> Vec<CaseAlert> {
    let mut alerts: Vec<CaseAlert> = counts
        .iter()
        .filter_map(|count| {
            let level = level_for(count.total)?;
            Some(CaseAlert {
                barangay: count.barangay.clone(),
                level,
                cases: count.total,
                active_cases: count.active,
                message: format!(
                    "{} reported {} case(s) in the last {days} day(s), {} still active",
                    count.barangay, count.total, count.active
                ),
            })
        })
        .collect();

    alerts.sort_by(|a, b| b.level.cmp(&a.level));
    alerts
}

/// Subject and plain-text body of the alert email sent to officials.
#[must_use]
pub fn alert_digest(alerts: &[CaseAlert], days: u32) -> (String, String) {
    let subject = if alerts.iter().any(|a| a.level == AlertLevel::Outbreak) {
        format!("[OUTBREAK] Dengue alert for {} barangay(s)", alerts.len())
    } else {
        format!("Dengue alert for {} barangay(s)", alerts.len())
    };

    let mut body = format!("Dengue case alerts for the last {days} day(s):\n\n");
    for alert in alerts {
        let _ = writeln!(
            body,
            "- {} [{}]: {} case(s), {} active",
            alert.barangay,
            alert.level.as_ref().to_uppercase(),
            alert.cases,
            alert.active_cases
        );
    }
    body.push_str(
        "\nPlease coordinate vector control and case monitoring with the city health office.\n",
    );

    (subject, body)
}
