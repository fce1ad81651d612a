use serde::Serialize;

/// Headline figures from the deployment case study. Static, never sampled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetrics {
    /// Percent.
    pub downtime_reduction: u32,
    /// Percent.
    pub cost_savings: u32,
    /// Percent.
    pub safety_increase: u32,
    /// Percent.
    pub inference_accuracy: f64,
    pub assets_monitored: u32,
    pub alerts_processed: u32,
}

pub const KEY_METRICS: KeyMetrics = KeyMetrics {
    downtime_reduction: 50,
    cost_savings: 20,
    safety_increase: 15,
    inference_accuracy: 94.7,
    assets_monitored: 847,
    alerts_processed: 12453,
};
