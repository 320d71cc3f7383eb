use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DocStatus {
    Processed,
    #[serde(rename = "FLAGGED")]
    Flagged,
}

impl fmt::Display for DocStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocStatus::Processed => f.write_str("Processed"),
            DocStatus::Flagged => f.write_str("FLAGGED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskScore {
    Low,
    #[serde(rename = "HIGH")]
    High,
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskScore::Low => f.write_str("Low"),
            RiskScore::High => f.write_str("HIGH"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetyDocument {
    pub name: String,
    pub status: DocStatus,
    pub risk: RiskScore,
    pub received: String,
}

/// Scanned HSE documents in processing order.
pub fn safety_queue() -> Vec<SafetyDocument> {
    [
        ("Site_Inspection_Secunda.pdf", DocStatus::Processed, RiskScore::Low, "Today 09:00"),
        ("PPE_Audit_JHB.pdf", DocStatus::Processed, RiskScore::Low, "Today 08:30"),
        ("Incident_Report_KZN.pdf", DocStatus::Flagged, RiskScore::High, "Yesterday"),
        ("Compliance_Cert_04.pdf", DocStatus::Processed, RiskScore::Low, "Yesterday"),
    ]
    .into_iter()
    .map(|(name, status, risk, received)| SafetyDocument {
        name: name.to_string(),
        status,
        risk,
        received: received.to_string(),
    })
    .collect()
}

pub fn flagged(documents: &[SafetyDocument]) -> Vec<SafetyDocument> {
    documents
        .iter()
        .filter(|doc| doc.status == DocStatus::Flagged)
        .cloned()
        .collect()
}
