//! Operational monitoring shown to the client side: fuel-flow watch, the
//! safety-document queue, and the alerts aggregated from both.

mod fuel;
mod safety;

use serde::Serialize;

pub use fuel::{
    DEFAULT_DROP_THRESHOLD, FLOW_START, FlowAnomaly, FlowStatus, FuelReading, detect_flow_drop,
    flow_status, fuel_flow,
};
pub use safety::{DocStatus, RiskScore, SafetyDocument, flagged, safety_queue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Critical,
    Notice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertSource {
    LiquidAutomation,
    Safety,
    Group,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub severity: Severity,
    pub source: AlertSource,
    pub message: String,
}

/// Alerts for the group cockpit. Falls back to one all-clear notice.
pub fn collect_alerts(
    readings: &[FuelReading],
    documents: &[SafetyDocument],
    drop_threshold: f64,
) -> Vec<Alert> {
    let mut alerts = Vec::new();
    if let Some(anomaly) = detect_flow_drop(readings, drop_threshold) {
        alerts.push(Alert {
            severity: Severity::Critical,
            source: AlertSource::LiquidAutomation,
            message: format!(
                "Flow rate on {} fell to {} L/hr, {:.0}% below the {:.0} L/hr baseline. Potential leak.",
                anomaly.date,
                anomaly.flow_lph,
                anomaly.drop_ratio * 100.0,
                anomaly.baseline_lph
            ),
        });
    }
    for doc in flagged(documents) {
        alerts.push(Alert {
            severity: Severity::Critical,
            source: AlertSource::Safety,
            message: format!("{} flagged for immediate review ({} risk).", doc.name, doc.risk),
        });
    }
    if alerts.is_empty() {
        alerts.push(Alert {
            severity: Severity::Notice,
            source: AlertSource::Group,
            message: "All monitored systems nominal.".to_string(),
        });
    }
    alerts
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SiteStatus {
    Online,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Site {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: SiteStatus,
}

/// Group footprint listed on the central command view.
pub fn sites() -> Vec<Site> {
    [
        ("Veridian HQ", -26.1076, 28.0567, SiteStatus::Online),
        ("S&R Site", -25.8728, 29.2554, SiteStatus::Alert),
        ("Bonnyvale", -32.9833, 27.8667, SiteStatus::Online),
    ]
    .into_iter()
    .map(|(name, latitude, longitude, status)| Site {
        name: name.to_string(),
        latitude,
        longitude,
        status,
    })
    .collect()
}
