use serde::Serialize;
use time::{Date, Duration, macros::date};

/// First day of the monitored fuel-flow window.
pub const FLOW_START: Date = date!(2025 - 12 - 01);

/// A drop of more than this share below baseline is reported.
pub const DEFAULT_DROP_THRESHOLD: f64 = 0.15;

const DAILY_FLOW_LPH: [u32; 14] = [
    12000, 12500, 11900, 12100, 12300, 12050, 11800, 12200, 12400, 12100, 12300, 12000, 11500,
    9800,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FuelReading {
    pub date: Date,
    pub flow_lph: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlowAnomaly {
    pub date: Date,
    pub flow_lph: u32,
    pub baseline_lph: f64,
    /// Share below baseline, e.g. `0.19` for a 19% drop.
    pub drop_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlowStatus {
    pub current: FuelReading,
    /// Change against the previous reading, in L/hr.
    pub change_lph: i64,
    pub anomaly: Option<FlowAnomaly>,
}

/// Daily pump readings for the monitored site.
pub fn fuel_flow() -> Vec<FuelReading> {
    DAILY_FLOW_LPH
        .iter()
        .enumerate()
        .map(|(day, &flow_lph)| FuelReading {
            date: FLOW_START + Duration::days(day as i64),
            flow_lph,
        })
        .collect()
}

/// Compare the latest reading with the mean of everything before it.
pub fn detect_flow_drop(readings: &[FuelReading], threshold: f64) -> Option<FlowAnomaly> {
    let (latest, history) = readings.split_last()?;
    if history.is_empty() {
        return None;
    }
    let baseline_lph =
        history.iter().map(|r| f64::from(r.flow_lph)).sum::<f64>() / history.len() as f64;
    if baseline_lph <= 0.0 {
        return None;
    }
    let drop_ratio = (baseline_lph - f64::from(latest.flow_lph)) / baseline_lph;
    (drop_ratio > threshold).then_some(FlowAnomaly {
        date: latest.date,
        flow_lph: latest.flow_lph,
        baseline_lph,
        drop_ratio,
    })
}

pub fn flow_status(readings: &[FuelReading], threshold: f64) -> Option<FlowStatus> {
    let current = *readings.last()?;
    let previous = readings
        .len()
        .checked_sub(2)
        .map(|i| readings[i].flow_lph)
        .unwrap_or(current.flow_lph);
    Some(FlowStatus {
        current,
        change_lph: i64::from(current.flow_lph) - i64::from(previous),
        anomaly: detect_flow_drop(readings, threshold),
    })
}
